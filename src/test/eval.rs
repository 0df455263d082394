use super::cmp;

#[test]
fn appends_sum_and_replaces_field_one() {
    cmp(&["eval", "-e", "$1 + $2", "-r", "1,$2"], "3,4\n", "4,4,7\n");
}

#[test]
fn if_selects_between_true_and_false_arms() {
    cmp(
        &["eval", "--if", "$1 > 1", "-e", "'big'", "-e", "'small'"],
        "5\n0\n",
        "5,big\n0,small\n",
    );
}
