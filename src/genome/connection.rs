use super::InnoGen;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub inno: usize,
    pub from: usize,
    pub to: usize,
    pub weight: f64,
    pub enabled: bool,
}

impl Connection {
    /// A new enabled connection whose innovation id is shared with any other (from, to) path
    /// created during the same reproduction cycle
    pub fn new(from: usize, to: usize, weight: f64, inno: &mut InnoGen) -> Self {
        Self {
            inno: inno.path((from, to)),
            from,
            to,
            weight,
            enabled: true,
        }
    }

    #[inline]
    pub fn path(&self) -> (usize, usize) {
        (self.from, self.to)
    }

    /// Disable this connection and return the pair replacing it through `center`
    pub fn bisect(&mut self, center: usize, inno: &mut InnoGen) -> (Self, Self) {
        self.enabled = false;
        (
            // from -{1.}> bisect-node
            Self::new(self.from, center, 1., inno),
            // bisect-node -{w}> to
            Self::new(center, self.to, self.weight, inno),
        )
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            inno: 0,
            from: 0,
            to: 0,
            weight: 0.,
            enabled: true,
        }
    }
}
