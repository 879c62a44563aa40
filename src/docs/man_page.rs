//! Man-page assembly

use crate::docs::DocumentationSource;

/// Heading placed above implementation notes
pub const IMPLEMENTATION_HEADING: &str = "Implementation details:";

/// Text used when a kind has no usage guidance
pub fn missing_usage_text(kind: &str) -> String {
    format!(
        "No usage information available for custom resource kind '{}'.",
        kind
    )
}

/// Combine usage guidance and optional implementation notes into one page
pub fn compose_man_page(kind: &str, usage: Option<&str>, implementation: Option<&str>) -> String {
    let mut page = match usage.map(str::trim_end).filter(|text| !text.is_empty()) {
        Some(text) => text.to_string(),
        None => missing_usage_text(kind),
    };

    if let Some(details) = implementation
        .map(str::trim_end)
        .filter(|text| !text.is_empty())
    {
        page.push_str("\n\n");
        page.push_str(IMPLEMENTATION_HEADING);
        page.push('\n');
        page.push_str(details);
    }

    page
}

/// Fetch usage and implementation text for `kind` and assemble its man page
///
/// Fetch failures are logged and treated like missing text.
pub async fn assemble(source: &dyn DocumentationSource, kind: &str, namespace: &str) -> String {
    let usage = match source.fetch_usage_text(kind, namespace).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to fetch usage text for {}: {}", kind, e);
            None
        }
    };

    let implementation = match source.fetch_implementation_text(kind).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("No implementation details for {}: {}", kind, e);
            None
        }
    };

    compose_man_page(kind, usage.as_deref(), implementation.as_deref())
}
