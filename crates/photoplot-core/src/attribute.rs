//! Opaque attribute records and the sets that hold them.
//!
//! Attributes are metadata attached to a file, an aperture or a graphic
//! object. The command pipeline never interprets their values: an attribute
//! only knows how to add itself to a [`CommandSink`] ([`Attribute::generate`])
//! and how to delete itself again ([`Attribute::cleanup`]).
//!
//! An [`AttributeSet`] accepts the standard names of its [`AttributeKind`] and
//! user-defined names (those not starting with `.`). Any other name fails with
//! [`Error::UnknownAttribute`].
//!
//! # Example
//!
//! ```
//! # use photoplot_core::attribute::{Attribute, AttributeKind, AttributeSet};
//! # use photoplot_core::command::Command;
//! let mut set = AttributeSet::new(AttributeKind::Object);
//! set.insert(Attribute::net_name("GND")).unwrap();
//!
//! let mut commands: Vec<Command> = Vec::new();
//! set.generate(&mut commands);
//! assert_eq!(commands[0].render(), "%TO.N,GND*%");
//! ```

use indexmap::IndexMap;
use log::warn;

use crate::{
    command::{Command, CommandSink},
    error::{Error, Result},
};

/// What an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    File,
    Aperture,
    Object,
}

impl AttributeKind {
    /// Returns the opcode that adds an attribute of this kind.
    pub fn add_opcode(self) -> &'static str {
        match self {
            Self::File => "TF",
            Self::Aperture => "TA",
            Self::Object => "TO",
        }
    }

    /// Returns a human-readable name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Aperture => "aperture",
            Self::Object => "object",
        }
    }

    /// Standard attribute names recognized for this kind.
    pub fn standard_names(self) -> &'static [&'static str] {
        match self {
            Self::File => &[
                ".FileFunction",
                ".Part",
                ".FilePolarity",
                ".GenerationSoftware",
                ".CreationDate",
                ".ProjectId",
                ".MD5",
            ],
            Self::Aperture => &[".AperFunction", ".DrillTolerance", ".FlashText"],
            Self::Object => &[".N", ".C", ".P"],
        }
    }

    /// Returns `true` if `name` may be stored in a set of this kind.
    pub fn recognizes(self, name: &str) -> bool {
        !name.starts_with('.') || self.standard_names().contains(&name)
    }
}

/// A named attribute with an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    kind: AttributeKind,
    name: String,
    values: Vec<String>,
}

impl Attribute {
    /// Creates an attribute of any kind.
    pub fn new<I, V>(kind: AttributeKind, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            kind,
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a file attribute.
    pub fn file<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(AttributeKind::File, name, values)
    }

    /// Creates an aperture attribute.
    pub fn aperture<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(AttributeKind::Aperture, name, values)
    }

    /// Creates an object attribute.
    pub fn object<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(AttributeKind::Object, name, values)
    }

    /// `.GenerationSoftware,<vendor>,<application>,<version>`
    pub fn generation_software(vendor: &str, application: &str, version: &str) -> Self {
        Self::file(".GenerationSoftware", [vendor, application, version])
    }

    /// `.CreationDate,<timestamp>`
    pub fn creation_date(timestamp: &str) -> Self {
        Self::file(".CreationDate", [timestamp])
    }

    /// `.ProjectId,<name>,<guid>,<revision>`
    pub fn project_id(name: &str, guid: &str, revision: &str) -> Self {
        Self::file(".ProjectId", [name, guid, revision])
    }

    /// `.MD5,<hex digest>`
    pub fn md5(digest: &str) -> Self {
        Self::file(".MD5", [digest])
    }

    /// `.N,<net>`
    pub fn net_name(net: &str) -> Self {
        Self::object(".N", [net])
    }

    /// `.C,<reference designator>`
    pub fn component(reference: &str) -> Self {
        Self::object(".C", [reference])
    }

    /// `.AperFunction,<function fields...>`
    pub fn aper_function<I, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::aperture(".AperFunction", fields)
    }

    /// Returns the attribute kind.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Appends the command that adds this attribute.
    pub fn generate<S: CommandSink + ?Sized>(&self, sink: &mut S) {
        sink.push_command(Command::AddAttribute {
            kind: self.kind,
            name: self.name.clone(),
            values: self.values.clone(),
        });
    }

    /// Appends the command that deletes this attribute.
    ///
    /// File attributes are never deleted, so this is a no-op for them.
    pub fn cleanup<S: CommandSink + ?Sized>(&self, sink: &mut S) {
        if self.kind != AttributeKind::File {
            sink.push_command(Command::DeleteAttribute(Some(self.name.clone())));
        }
    }
}

/// An insertion-ordered set of attributes of one kind, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSet {
    kind: AttributeKind,
    entries: IndexMap<String, Attribute>,
}

impl AttributeSet {
    /// Creates an empty set for the given kind.
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    /// Returns the kind of attributes this set holds.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Adds an attribute, replacing any previous value of the same name in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAttribute`] if the attribute is of another kind
    /// or its name is not recognized for this kind.
    pub fn insert(&mut self, attribute: Attribute) -> Result<()> {
        if attribute.kind != self.kind || !self.kind.recognizes(&attribute.name) {
            return Err(Error::UnknownAttribute {
                name: attribute.name,
                container: self.kind.name(),
            });
        }

        self.entries.insert(attribute.name.clone(), attribute);
        Ok(())
    }

    /// Copies every attribute of `other` into this set.
    ///
    /// A set of another kind contributes nothing.
    pub fn merge(&mut self, other: &AttributeSet) {
        if other.kind != self.kind {
            warn!(from = other.kind.name(), into = self.kind.name(); "Skipping merge of mismatched attribute sets");
            return;
        }

        for attribute in other.iter() {
            self.entries
                .insert(attribute.name.clone(), attribute.clone());
        }
    }

    /// Looks up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.entries.get(name)
    }

    /// Iterates over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.values()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends the add-command of every attribute, in insertion order.
    pub fn generate<S: CommandSink + ?Sized>(&self, sink: &mut S) {
        for attribute in self.iter() {
            attribute.generate(sink);
        }
    }

    /// Appends the delete-command of every attribute, in insertion order.
    pub fn cleanup<S: CommandSink + ?Sized>(&self, sink: &mut S) {
        for attribute in self.iter() {
            attribute.cleanup(sink);
        }
    }
}
