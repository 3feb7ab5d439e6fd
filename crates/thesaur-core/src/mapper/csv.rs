//! Reader for the CSV aggregates built by the search query: rows separated
//! by newlines, fields separated by commas, every field double-quoted with
//! embedded quotes doubled. Quoted fields may span lines.

pub(crate) fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut touched = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                other => field.push(other),
            }
            continue;
        }
        match c {
            '"' => {
                quoted = true;
                touched = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                touched = true;
            }
            '\n' => {
                if touched || !field.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                touched = false;
            }
            '\r' => {}
            other => {
                field.push(other);
                touched = true;
            }
        }
    }
    if touched || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}
