use crate::fs::Entry;

/// Ends every menu and error response.
pub const TERMINATOR: &str = ".\r\n";

/// Gopher item types this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    File,
    Directory,
    Error,
    Info,
}

impl ItemType {
    pub fn as_char(&self) -> char {
        match self {
            ItemType::File => '0',
            ItemType::Directory => '1',
            ItemType::Error => '3',
            ItemType::Info => 'i',
        }
    }
}

/// Where selectors in a menu point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

/// `<type><display>\t<selector>\t<host>\t<port>\r\n`
pub fn menu_line(kind: ItemType, display: &str, selector: &str, host: &str, port: &str) -> String {
    format!("{}{}\t{}\t{}\t{}\r\n", kind.as_char(), display, selector, host, port)
}

/// Informational line with placeholder selector, host and port.
pub fn info_line(text: &str) -> String {
    menu_line(ItemType::Info, text, "-", "-", "-")
}

/// Error record, without the terminator.
pub fn error_line(message: &str) -> String {
    menu_line(ItemType::Error, message, "Error", "(NULL)", "0")
}

/// Menu line for one directory entry. `selector` is its root-relative path.
pub fn entry_line(entry: &Entry, selector: &str, endpoint: &Endpoint) -> String {
    let kind = if entry.is_dir() { ItemType::Directory } else { ItemType::File };
    let display = format!("{:>5}  {}", entry.marker(), entry.label());

    menu_line(kind, &display, selector, &endpoint.host, &endpoint.port.to_string())
}

/// Complete error response: one error record and the terminator.
pub fn render_error(message: &str) -> Vec<u8> {
    let mut out = error_line(message);
    out.push_str(TERMINATOR);
    out.into_bytes()
}

/// Complete menu response.
///
/// `header` lines are rendered as info lines, followed by the folder line,
/// a blank info line, one line per `(entry, selector)` and the terminator.
pub fn render_menu(
    header: &[String],
    folder: &str,
    entries: &[(Entry, String)],
    endpoint: &Endpoint,
) -> Vec<u8> {
    let mut out = String::new();

    for line in header {
        out.push_str(&info_line(line));
    }
    out.push_str(&info_line(&format!("Folder: {}", folder)));
    out.push_str(&info_line(""));

    for (entry, selector) in entries {
        out.push_str(&entry_line(entry, selector, endpoint));
    }

    out.push_str(TERMINATOR);
    out.into_bytes()
}

/// Folder heading for a root-relative selector: `/` for the root,
/// `/a/b/` otherwise.
pub fn folder_heading(selector: &str) -> String {
    if selector.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", selector)
    }
}
