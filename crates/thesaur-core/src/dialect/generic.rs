use super::DialectStrategy;

/// Plain SPARQL 1.1: label scans filtered by the match classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Generic;

impl DialectStrategy for Generic {
    fn name(&self) -> &'static str {
        "generic"
    }
}
