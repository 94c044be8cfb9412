use std::fmt::Write;

use log::{info, trace};

use photoplot_core::{
    Result,
    attribute::Attribute,
    command::{Command, CommandSink},
};

use super::checksum;
use crate::stream::{GenerateContext, Node, Stream};

/// Second pass: expands a first-pass stream into text, strictly in order.
///
/// Deferred generators are expanded depth-first into fresh sub-streams before
/// the next node is looked at. The checksum node hashes what has been rendered
/// so far and renders itself in place.
pub(crate) struct Serializer<'c, 'r> {
    ctx: &'c mut GenerateContext<'r>,
    output: String,
    lines: usize,
}

impl<'c, 'r> Serializer<'c, 'r> {
    pub(crate) fn new(ctx: &'c mut GenerateContext<'r>) -> Self {
        Self {
            ctx,
            output: String::new(),
            lines: 0,
        }
    }

    pub(crate) fn expand(&mut self, stream: Stream<'_>) -> Result<()> {
        for node in stream.into_nodes() {
            match node {
                Node::Command(command) => self.write_line(&command.render()),
                Node::Deferred(generator) => {
                    let mut sub = Stream::new();
                    generator.generate(self.ctx, &mut sub)?;
                    self.expand(sub)?;
                }
                Node::Checksum => {
                    let digest = checksum::compute(&self.output);
                    info!(md5 = digest; "Computed checksum");

                    Attribute::md5(&digest).generate(self);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> (String, usize) {
        (self.output, self.lines)
    }

    fn write_line(&mut self, line: &str) {
        trace!(line; "Rendered command");
        // writing into a String cannot fail
        let _ = writeln!(self.output, "{line}");
        self.lines += 1;
    }
}

impl CommandSink for Serializer<'_, '_> {
    fn push_command(&mut self, command: Command) {
        self.write_line(&command.render());
    }
}
