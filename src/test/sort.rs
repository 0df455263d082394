use super::cmp;

#[test]
fn numeric_descending_sort() {
    cmp(&["sort", "-f", "2:DN"], "a,10\nb,2\nc,100\n", "c,100\na,10\nb,2\n");
}

#[test]
fn multi_key_sort_falls_through_ties() {
    cmp(&["sort", "-f", "1,2:N"], "a,2\na,1\nb,0\n", "a,1\na,2\nb,0\n");
}
