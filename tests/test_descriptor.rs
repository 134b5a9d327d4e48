use treeserve::fs::DescriptorTable;

#[test]
fn test_parse_collapses_whitespace() {
    let table = DescriptorTable::parse("readme.txt    Project   overview\tand notes\n");
    assert_eq!(table.lookup("readme.txt"), Some("Project overview and notes"));
}

#[test]
fn test_parse_skips_lines_without_description() {
    let table = DescriptorTable::parse("lonely.txt\n\n   \nreal.txt Described\n");

    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup("lonely.txt"), None);
    assert_eq!(table.lookup("real.txt"), Some("Described"));
}

#[test]
fn test_parse_later_line_wins() {
    let table = DescriptorTable::parse("a.txt First\na.txt Second\n");
    assert_eq!(table.lookup("a.txt"), Some("Second"));
}

#[test]
fn test_lookup_case_fallbacks() {
    let table = DescriptorTable::parse("readme.txt Project overview\nGAME.ROM Arcade port\n");

    // Exact
    assert_eq!(table.lookup("readme.txt"), Some("Project overview"));
    // Lowercase fallback
    assert_eq!(table.lookup("README.TXT"), Some("Project overview"));
    assert_eq!(table.lookup("ReadMe.txt"), Some("Project overview"));
    // Uppercase fallback
    assert_eq!(table.lookup("game.rom"), Some("Arcade port"));
    // No match
    assert_eq!(table.lookup("other.txt"), None);
}

#[test]
fn test_lookup_prefers_exact_match() {
    let table = DescriptorTable::parse("Mixed.txt Exact\nmixed.txt Lower\n");
    assert_eq!(table.lookup("Mixed.txt"), Some("Exact"));
    assert_eq!(table.lookup("MIXED.TXT"), Some("Lower"));
}

#[tokio::test]
async fn test_load_prefers_00index_over_descript_ion() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("00index.txt"), "a.txt From index\n").unwrap();
    std::fs::write(dir.path().join("descript.ion"), "a.txt From ion\nb.txt Only ion\n").unwrap();

    let table = DescriptorTable::load(dir.path()).await;

    assert_eq!(table.lookup("a.txt"), Some("From index"));
    // Never merged
    assert_eq!(table.lookup("b.txt"), None);
}

#[tokio::test]
async fn test_load_falls_back_to_descript_ion() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("descript.ion"), "b.txt Only ion\n").unwrap();

    let table = DescriptorTable::load(dir.path()).await;
    assert_eq!(table.lookup("b.txt"), Some("Only ion"));
}

#[tokio::test]
async fn test_load_without_descriptor_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DescriptorTable::load(dir.path()).await.is_empty());
}

#[tokio::test]
async fn test_load_ignores_descriptor_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("00index.txt")).unwrap();
    std::fs::write(dir.path().join("descript.ion"), "c.txt Used\n").unwrap();

    let table = DescriptorTable::load(dir.path()).await;
    assert_eq!(table.lookup("c.txt"), Some("Used"));
}

#[tokio::test]
async fn test_load_tolerates_non_utf8() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("00index.txt"), b"caf.txt Caf\xe9 menu\n").unwrap();

    let table = DescriptorTable::load(dir.path()).await;
    assert!(table.lookup("caf.txt").unwrap().starts_with("Caf"));
}
