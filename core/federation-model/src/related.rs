//! Minimal stand-in for a relayable's parent.

/// What a relayable needs to know about its parent: who wrote it, whether
/// that author lives on this pod, and whether it is public.
///
/// Never serialized; the host builds it from its own storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedEntity {
    pub author: String,
    pub local: bool,
    pub public: bool,
    pub parent: Option<Box<RelatedEntity>>,
}

impl RelatedEntity {
    pub fn new(author: impl Into<String>, local: bool, public: bool) -> Self {
        Self {
            author: author.into(),
            local,
            public,
            parent: None,
        }
    }

    /// Attaches the grandparent, e.g. the post a commented-on comment belongs to.
    #[must_use]
    pub fn with_parent(mut self, parent: RelatedEntity) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// The top of the chain.
    pub fn root(&self) -> &RelatedEntity {
        let mut current = self;
        while let Some(parent) = &current.parent {
            current = parent;
        }
        current
    }
}
