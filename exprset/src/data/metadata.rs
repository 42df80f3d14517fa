use indexmap::IndexMap;
use itertools::Itertools;

/// Free-form description of the experiment behind an expression set.
/// Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub lab: Option<String>,
    pub contact: Option<String>,
    pub url: Option<String>,
    pub abstract_text: Option<String>,
    /// Publication identifiers, e.g. PubMed ids.
    pub references: Vec<String>,
    pub protocol: Option<String>,
    pub notes: IndexMap<String, String>,
}

impl ExperimentMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_lab<S: Into<String>>(mut self, lab: S) -> Self {
        self.lab = Some(lab.into());
        self
    }

    pub fn with_contact<S: Into<String>>(mut self, contact: S) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_abstract<S: Into<String>>(mut self, text: S) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    pub fn with_reference<S: Into<String>>(mut self, reference: S) -> Self {
        self.references.push(reference.into());
        self
    }

    pub fn with_protocol<S: Into<String>>(mut self, protocol: S) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_note<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.notes.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl std::fmt::Display for ExperimentMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "Experiment data: empty");
        }
        write!(f, "Experiment data")?;
        let fields = [
            ("title", &self.title),
            ("lab", &self.lab),
            ("contact", &self.contact),
            ("url", &self.url),
            ("protocol", &self.protocol),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                write!(f, "\n    {}: {}", key, value)?;
            }
        }
        if !self.authors.is_empty() {
            write!(f, "\n    authors: {}", self.authors.iter().join(", "))?;
        }
        if !self.references.is_empty() {
            write!(f, "\n    references: {}", self.references.iter().join(", "))?;
        }
        if let Some(text) = &self.abstract_text {
            write!(f, "\n    abstract: {} words", text.split_whitespace().count())?;
        }
        for (key, value) in self.notes.iter() {
            write!(f, "\n    {}: {}", key, value)?;
        }
        Ok(())
    }
}
