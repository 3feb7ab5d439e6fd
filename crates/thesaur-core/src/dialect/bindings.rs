use super::DialectStrategy;

/// Stores that predate SPARQL 1.1 `VALUES` and only accept the draft
/// `BINDINGS` clause.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings;

impl DialectStrategy for Bindings {
    fn name(&self) -> &'static str {
        "bindings"
    }

    fn values_block(&self, vars: &[&str], rows: &[Vec<String>]) -> String {
        format!("BINDINGS {} {{ {} }}", vars.join(" "), super::render_rows(rows))
    }
}
