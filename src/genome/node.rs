use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// takes its value straight from the network input
    Sensory,
    /// copied into the network output
    Action,
    /// born from bisecting a connection
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub inno: usize,
    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn new(inno: usize, kind: NodeKind) -> Self {
        Self { inno, kind }
    }

    #[inline]
    pub fn is_sensory(&self) -> bool {
        matches!(self.kind, NodeKind::Sensory)
    }

    #[inline]
    pub fn is_action(&self) -> bool {
        matches!(self.kind, NodeKind::Action)
    }
}
