use assert_cmd::Command;
use std::io::Write;

#[test]
fn merges_two_sorted_files_on_key() {
    let mut f1 = tempfile::NamedTempFile::new().unwrap();
    write!(f1, "a\nc\ne\n").unwrap();
    let mut f2 = tempfile::NamedTempFile::new().unwrap();
    write!(f2, "b\nd\nf\n").unwrap();

    Command::cargo_bin("csvfix")
        .unwrap()
        .args(["fmerge", "-f", "1", f1.path().to_str().unwrap(), f2.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout("a\nb\nc\nd\ne\nf\n");
}
