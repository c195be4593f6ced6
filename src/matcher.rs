use aho_corasick::AhoCorasick;

use crate::error::Result;
use crate::types::IpSet;

/// Substring test of a line against every address of an [`IpSet`].
///
/// Uses Aho-Corasick so a line is scanned once regardless of how many
/// addresses are loaded. Plain substring semantics: `10.0.0.5` also
/// matches inside `10.0.0.50`.
#[derive(Debug, Clone)]
pub struct IpMatcher {
    automaton: AhoCorasick,
    patterns: usize,
}

impl IpMatcher {
    pub fn new(ips: &IpSet) -> Result<Self> {
        let automaton = AhoCorasick::new(ips.iter())?;
        Ok(Self {
            automaton,
            patterns: ips.len(),
        })
    }

    pub fn is_match<B: AsRef<[u8]>>(&self, line: B) -> bool {
        self.patterns > 0 && self.automaton.is_match(line.as_ref())
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns
    }
}
