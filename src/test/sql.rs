use super::cmp;

#[test]
fn sql_insert_quotes_string_values() {
    cmp(
        &["sql_insert", "-t", "T", "-f", "1:x,2:y"],
        "1,hi\n",
        "INSERT INTO T ( x, y ) VALUES( '1', 'hi')\n;\n",
    );
}
