use crate::host::{Host, HostResult};

const OFFSCREEN_STYLE: &str = "position:fixed;top:-1000px;left:-1000px;opacity:0";

/// Copy `text` to the system clipboard.
///
/// Tries the asynchronous clipboard API first; if it rejects, falls back to
/// an off-screen text field and the legacy copy command. Resolves to whether
/// the text ended up on the clipboard; never errors.
pub async fn copy_text<H: Host + ?Sized>(host: &H, text: &str, debug: bool) -> bool {
    match host.write_text(text).await {
        Ok(()) => true,
        Err(err) => {
            if debug {
                tracing::debug!(error = %err, "clipboard API rejected, using legacy copy");
            }
            match legacy_copy(host, text) {
                Ok(copied) => copied,
                Err(err) => {
                    if debug {
                        tracing::warn!(error = %err, "legacy copy failed");
                    }
                    false
                }
            }
        }
    }
}

fn legacy_copy<H: Host + ?Sized>(host: &H, text: &str) -> HostResult<bool> {
    let field = host.create_element("textarea")?;
    host.set_attribute(field, "readonly", "")?;
    host.set_attribute(field, "style", OFFSCREEN_STYLE)?;
    host.set_text(field, text)?;
    host.append_to_body(field)?;

    let copied = host.select_contents(field).and_then(|_| host.exec_copy());
    host.remove(field);
    copied
}
