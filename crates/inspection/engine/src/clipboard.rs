//! Copying variable values to the clipboard.

use inspection_types::{InspectionResult, VariableValue};

/// Somewhere a copied value can be written.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> InspectionResult<()>;
}

/// The system clipboard.
///
/// A clipboard handle is acquired for each write and released right after;
/// nothing is held between copies.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> InspectionResult<()> {
        use inspection_types::InspectionError;

        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| InspectionError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| InspectionError::Clipboard(e.to_string()))
    }
}

/// Copy a variable value as text.
///
/// Booleans and empty values are not copied. Returns whether a write
/// happened.
pub fn copy_value(value: &VariableValue, sink: &impl ClipboardSink) -> InspectionResult<bool> {
    if value.is_boolean() || value.is_empty() {
        return Ok(false);
    }

    let text = value.to_string();
    sink.write_text(&text)?;
    tracing::debug!(chars = text.len(), "Copied variable value");
    Ok(true)
}
