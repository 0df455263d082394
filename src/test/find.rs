use super::cmp;

#[test]
fn find_and_remove_partition_input() {
    let input = "apple,1\nbanana,2\napricot,3\n";
    cmp(&["find", "-f", "1", "-e", "^a"], input, "apple,1\napricot,3\n");
    cmp(&["remove", "-f", "1", "-e", "^a"], input, "banana,2\n");
}
