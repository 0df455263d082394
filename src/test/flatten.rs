use super::cmp;

#[test]
fn flatten_coalesces_rows_sharing_key() {
    cmp(&["flatten", "-k", "1"], "a,1\na,2\nb,3\n", "a,1,2\nb,3\n");
}

#[test]
fn unflatten_is_the_inverse_of_flatten() {
    cmp(&["unflatten", "-k", "1", "-n", "1"], "a,1,2\nb,3\n", "a,1\na,2\nb,3\n");
}
