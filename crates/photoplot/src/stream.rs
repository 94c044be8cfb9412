//! The in-progress command stream and the [`Generator`] seam.
//!
//! Generation runs in two passes. The first pass fills a [`Stream`] with
//! [`Node`]s: plain commands, deferred generators and the checksum marker. The
//! second pass expands that list strictly left to right, asking every deferred
//! generator to fill a fresh sub-stream that is expanded before the next node.
//!
//! All graphics state lives in the [`GenerateContext`] handed to each
//! generator by exclusive reference, so exactly one writer ever touches it.

use photoplot_core::{
    Result,
    command::{Command, CommandSink, DCode},
};

use crate::{aperture::ApertureRef, engine::StateEngine, registry::ApertureRegistry};

/// Something that appends commands, or further generators, to a stream.
pub trait Generator {
    /// Appends this object's commands to `stream`.
    ///
    /// # Errors
    ///
    /// Any usage error aborts generation of the whole layer.
    fn generate<'a>(&'a self, ctx: &mut GenerateContext<'_>, stream: &mut Stream<'a>)
    -> Result<()>;

    /// Appends the commands that undo this object's attributes.
    fn cleanup(&self, _stream: &mut Stream<'_>) {}
}

/// One entry of a [`Stream`].
pub enum Node<'a> {
    /// A directly renderable command.
    Command(Command),
    /// A generator expanded in place during the second pass.
    Deferred(&'a dyn Generator),
    /// Marker for the checksum of everything rendered before it.
    Checksum,
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
            Self::Checksum => f.write_str("Checksum"),
        }
    }
}

/// An ordered list of [`Node`]s.
#[derive(Debug, Default)]
pub struct Stream<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> Stream<'a> {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn push(&mut self, command: Command) {
        self.nodes.push(Node::Command(command));
    }

    /// Appends a generator to be expanded later, in this position.
    pub fn defer(&mut self, generator: &'a dyn Generator) {
        self.nodes.push(Node::Deferred(generator));
    }

    /// Appends the checksum marker.
    pub fn push_checksum(&mut self) {
        self.nodes.push(Node::Checksum);
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the stream holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Node<'a>> {
        self.nodes.iter()
    }

    /// Returns the commands of this stream, skipping deferred and checksum nodes.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Command(command) => Some(command),
            _ => None,
        })
    }

    /// Consumes the stream, returning its nodes.
    pub fn into_nodes(self) -> Vec<Node<'a>> {
        self.nodes
    }
}

impl CommandSink for Stream<'_> {
    fn push_command(&mut self, command: Command) {
        self.push(command);
    }
}

/// Mutable state threaded through every [`Generator::generate`] call of one layer.
#[derive(Debug)]
pub struct GenerateContext<'r> {
    engine: StateEngine,
    apertures: &'r ApertureRegistry,
}

impl<'r> GenerateContext<'r> {
    /// Creates a context with fresh graphics state over the given registry.
    pub fn new(apertures: &'r ApertureRegistry) -> Self {
        Self {
            engine: StateEngine::new(),
            apertures,
        }
    }

    /// Returns the state engine.
    pub fn engine(&self) -> &StateEngine {
        &self.engine
    }

    /// Returns the state engine for mutation.
    pub fn engine_mut(&mut self) -> &mut StateEngine {
        &mut self.engine
    }

    /// Returns the D-code assigned to `aperture`.
    ///
    /// # Errors
    ///
    /// Returns [`photoplot_core::Error::UnassignedAperture`] if the aperture
    /// was never registered with this layer.
    pub fn dcode_of(&self, aperture: &ApertureRef) -> Result<DCode> {
        self.apertures.dcode_of(aperture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    impl Generator for Marker {
        fn generate<'a>(
            &'a self,
            _ctx: &mut GenerateContext<'_>,
            stream: &mut Stream<'a>,
        ) -> Result<()> {
            stream.push(Command::Comment("marker".to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_stream_keeps_order() {
        let marker = Marker;
        let mut stream = Stream::new();
        stream.push(Command::StartRegion);
        stream.defer(&marker);
        stream.push_checksum();
        stream.push_command(Command::EndOfFile);

        let kinds: Vec<&str> = stream
            .iter()
            .map(|node| match node {
                Node::Command(_) => "command",
                Node::Deferred(_) => "deferred",
                Node::Checksum => "checksum",
            })
            .collect();
        assert_eq!(kinds, vec!["command", "deferred", "checksum", "command"]);
        assert_eq!(stream.commands().count(), 2);
        assert_eq!(stream.len(), 4);
    }

    #[test]
    fn test_deferred_generator_fills_sub_stream() {
        let registry = ApertureRegistry::new();
        let mut ctx = GenerateContext::new(&registry);
        let marker = Marker;

        let mut sub = Stream::new();
        marker.generate(&mut ctx, &mut sub).unwrap();

        let rendered: Vec<String> = sub.commands().map(Command::render).collect();
        assert_eq!(rendered, vec!["G04 marker*"]);
    }
}
