//! Error adapter for converting PhotoplotError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use photoplot::{GraphicsError, PhotoplotError};

/// Adapter rendering a [`PhotoplotError`] through miette.
///
/// Photoplot errors carry no source spans, so only the code and an optional
/// help line are reported.
pub struct ErrorAdapter<'a>(pub &'a PhotoplotError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PhotoplotError::Io(_) => "photoplot::io",
            PhotoplotError::Graphics(_) => "photoplot::graphics",
            PhotoplotError::Config(_) => "photoplot::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        help(self.0).map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn help(err: &PhotoplotError) -> Option<&'static str> {
    match err {
        PhotoplotError::Graphics(GraphicsError::UnassignedAperture(_)) => {
            Some("append the aperture, or a flash using it, to the layer before rendering")
        }
        PhotoplotError::Graphics(GraphicsError::Configuration(_)) => {
            Some("build every coordinate of a layer with that layer's format")
        }
        PhotoplotError::Graphics(GraphicsError::UnknownAttribute { .. }) => {
            Some("dot-prefixed names are reserved for the standard attributes of each kind")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    fn code(err: &PhotoplotError) -> Option<String> {
        ErrorAdapter(err).code().map(|c| c.to_string())
    }

    #[test]
    fn test_codes() {
        let io = PhotoplotError::Io(io::Error::other("disk full"));
        let graphics = PhotoplotError::Graphics(GraphicsError::MissingState("arc center"));
        let config = PhotoplotError::Config("bad".to_string());

        assert_eq!(code(&io).as_deref(), Some("photoplot::io"));
        assert_eq!(code(&graphics).as_deref(), Some("photoplot::graphics"));
        assert_eq!(code(&config).as_deref(), Some("photoplot::config"));
    }

    #[test]
    fn test_display_passes_through() {
        let err = PhotoplotError::Config("unknown aperture".to_string());
        assert_eq!(
            ErrorAdapter(&err).to_string(),
            "Configuration error: unknown aperture"
        );
    }

    #[test]
    fn test_help_for_unassigned_aperture() {
        let err = PhotoplotError::Graphics(GraphicsError::UnassignedAperture("circle 0.05".to_string()));
        let help = ErrorAdapter(&err).help().map(|h| h.to_string());
        assert!(help.is_some_and(|h| h.contains("append")));
    }

    #[test]
    fn test_renders_with_graphical_handler() {
        let err = PhotoplotError::Config("unknown aperture".to_string());
        let mut writer = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut writer, &ErrorAdapter(&err))
            .unwrap();

        assert!(writer.contains("photoplot::config"));
        assert!(writer.contains("unknown aperture"));
    }
}
