//! LilyPond document template
//!
//! The musical content is generated in `lilypond.rs`; the surrounding
//! document (version, language, header, score block) comes from
//! `templates/score.ly.mustache`. Every value is inserted unescaped
//! (`{{{...}}}`), LilyPond escaping is done before rendering.

use crate::converters::mxsr_to_msr::ConversionError;
use serde::Serialize;

const SCORE_TEMPLATE: &str = include_str!("templates/score.ly.mustache");

/// Context data for template rendering
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// LilyPond version (e.g., "2.24.0")
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,

    pub has_title: bool,
    pub has_composer: bool,
    pub has_header: bool,

    /// One `\new Staff` / `\new PianoStaff` block per part
    pub parts: String,
}

impl TemplateContext {
    pub fn new(version: String, parts: String) -> Self {
        Self {
            version,
            title: None,
            composer: None,
            has_title: false,
            has_composer: false,
            has_header: false,
            parts,
        }
    }

    pub fn builder(version: String, parts: String) -> TemplateContextBuilder {
        TemplateContextBuilder {
            context: TemplateContext::new(version, parts),
        }
    }
}

pub struct TemplateContextBuilder {
    context: TemplateContext,
}

impl TemplateContextBuilder {
    pub fn title(mut self, title: Option<String>) -> Self {
        self.context.has_title = title.is_some();
        self.context.title = title;
        self
    }

    pub fn composer(mut self, composer: Option<String>) -> Self {
        self.context.has_composer = composer.is_some();
        self.context.composer = composer;
        self
    }

    pub fn build(mut self) -> TemplateContext {
        self.context.has_header = self.context.has_title || self.context.has_composer;
        self.context
    }
}

/// Render the LilyPond document around already generated parts
pub fn render_lilypond(context: &TemplateContext) -> Result<String, ConversionError> {
    let template = mustache::compile_str(SCORE_TEMPLATE)
        .map_err(|e| ConversionError::TemplateError(e.to_string()))?;
    template
        .render_to_string(context)
        .map_err(|e| ConversionError::TemplateError(e.to_string()))
}
