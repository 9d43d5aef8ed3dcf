// Small corpus with known disagreements
// WHY: every region below has a fixed expected verdict under the default uax29 + rule references

#![allow(dead_code)]

/// Three paragraphs; each becomes its own chunk
pub const BOOK_TEXT: &str = "It rained all day. We stayed inside.\n\nThe fire was warm and bright.\n\nDr. Watson arrived late. He was tired.\n";

/// Merges the first paragraph into one sentence and keeps the title with the name
pub const BOOK_PRIMARY: &str = "\
0\tIt rained all day. We stayed inside.\t(1,1,1,37)
1\tThe fire was warm and bright.\t(3,1,3,30)
2\tDr. Watson arrived late.\t(5,1,5,25)
3\tHe was tired.\t(5,26,5,39)
";

/// Annotation reference that splits the first paragraph the usual way
pub const BOOK_ANNOTATION: &str = "\
0\tIt rained all day.\t(1,1,1,19)
1\tWe stayed inside.\t(1,20,1,37)
2\tThe fire was warm and bright.\t(3,1,3,30)
3\tDr. Watson arrived late.\t(5,1,5,25)
4\tHe was tired.\t(5,26,5,39)
";

/// Single paragraph where every method agrees
pub const CALM_TEXT: &str = "The sea was calm. Gulls circled overhead.\n";

pub const CALM_PRIMARY: &str = "\
0\tThe sea was calm.\t(1,1,1,18)
1\tGulls circled overhead.\t(1,19,1,42)
";

/// Dialog region the primary fails to split
pub fn dialog_text(n: usize) -> String {
    format!("\"Come in,\" she said. The door number {n} opened slowly.\n")
}

pub fn dialog_primary(n: usize) -> String {
    let text = dialog_text(n);
    let line = text.trim_end();
    format!("0\t{line}\t(1,1,1,{})\n", line.chars().count() + 1)
}
