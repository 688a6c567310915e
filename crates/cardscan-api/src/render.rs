//! Server-side HTML for the upload form and the result page.

use cardscan_core::{Locale, ValidationReport, ValidationStatus};
use std::fmt::Write;

use crate::services::ScanOutcome;

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex;color:#262730}\
aside{width:260px;background:#f0f2f6;padding:24px;min-height:100vh;box-sizing:border-box}\
main{flex:1;padding:24px 48px;max-width:1100px}\
.columns{display:flex;gap:32px}.columns>div{flex:1}\
.box{padding:12px 16px;border-radius:6px;margin:12px 0}\
.success{background:#d4edda;color:#155724}.warning{background:#fff3cd;color:#856404}\
.error{background:#f8d7da;color:#721c24}.info{background:#d1ecf1;color:#0c5460}\
.field{margin:6px 0}img{max-width:100%;border-radius:6px}hr{margin:16px 0}";

/// Values every page needs
pub struct PageContext<'a> {
    pub locale: Locale,
    pub allowed_extensions: &'a [String],
    pub debug: bool,
}

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(ctx: &PageContext<'_>, body: &str) -> String {
    let locale = ctx.locale;
    let steps: String = locale
        .usage_steps()
        .iter()
        .map(|step| format!("<li>{}</li>", escape_html(step)))
        .collect();
    let debug_banner = if ctx.debug {
        format!(
            r#"<div class="box warning">{}</div>"#,
            escape_html(locale.debug_banner())
        )
    } else {
        String::new()
    };
    let accept: Vec<String> = ctx
        .allowed_extensions
        .iter()
        .map(|e| format!(".{}", e))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="utf-8"><title>{title}</title><style>{style}</style></head>
<body>
<aside>
<h3>{usage_heading}</h3>
<ol>{steps}</ol>
<p>{formats}</p>
</aside>
<main>
{debug_banner}<h1>&#128179; {title}</h1>
<p>{subtitle}</p>
<h3>{upload_heading}</h3>
<form method="post" action="/" enctype="multipart/form-data">
<label for="file">{upload_prompt}</label><br>
<input type="file" id="file" name="file" accept="{accept}" required>
<button type="submit">{submit}</button>
</form>
{body}
</main>
</body>
</html>
"#,
        lang = locale,
        title = escape_html(locale.page_title()),
        style = STYLE,
        usage_heading = escape_html(locale.usage_heading()),
        steps = steps,
        formats = escape_html(&locale.supported_formats(ctx.allowed_extensions)),
        debug_banner = debug_banner,
        subtitle = escape_html(locale.page_subtitle()),
        upload_heading = escape_html(locale.upload_heading()),
        upload_prompt = escape_html(locale.upload_prompt()),
        accept = escape_html(&accept.join(",")),
        submit = escape_html(locale.submit_label()),
        body = body,
    )
}

pub fn index_page(ctx: &PageContext<'_>) -> String {
    layout(ctx, "")
}

pub fn error_page(ctx: &PageContext<'_>, message: &str) -> String {
    layout(
        ctx,
        &format!(r#"<div class="box error">{}</div>"#, escape_html(message)),
    )
}

/// Per-field lines, the detected count and the aggregate banner.
pub fn validation_section(locale: Locale, report: &ValidationReport) -> String {
    let mut html = format!(
        r#"<div class="box info">{}</div>"#,
        escape_html(&locale.fields_detected(report.valid_count, report.total_count))
    );

    for verdict in &report.fields {
        let label = escape_html(verdict.field.display_name(locale));
        let line = match (&verdict.value, verdict.valid) {
            (Some(value), true) => format!("&#9989; <strong>{}:</strong> {}", label, escape_html(value)),
            _ => format!(
                "&#10060; <strong>{}:</strong> {}",
                label,
                escape_html(locale.not_detected())
            ),
        };
        let _ = write!(html, r#"<div class="field">{}</div>"#, line);
    }

    html.push_str("<hr>");
    let (class, banner) = match report.status {
        ValidationStatus::Full => ("success", locale.banner_full().to_string()),
        ValidationStatus::Partial => (
            "warning",
            locale.banner_partial(report.valid_count, report.total_count),
        ),
        ValidationStatus::None => ("error", locale.banner_none().to_string()),
    };
    let _ = write!(
        html,
        r#"<div class="box {}">{}</div>"#,
        class,
        escape_html(&banner)
    );
    html
}

pub fn result_page(ctx: &PageContext<'_>, outcome: &ScanOutcome) -> String {
    let locale = ctx.locale;
    let mut body = format!(
        r#"<div class="box success">{}</div>"#,
        escape_html(&locale.upload_succeeded(&outcome.file_name))
    );
    if !outcome.fields.is_empty() {
        let _ = write!(
            body,
            r#"<div class="box success">{}</div>"#,
            escape_html(locale.analysis_complete())
        );
    }
    let _ = write!(
        body,
        r#"<div class="columns"><div><h3>{}</h3><img src="{}" alt="{}"></div><div><h3>{}</h3>{}</div></div>"#,
        escape_html(locale.image_heading()),
        escape_html(&outcome.upload.url),
        escape_html(&outcome.file_name),
        escape_html(locale.validation_heading()),
        validation_section(locale, &outcome.report),
    );
    layout(ctx, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::{validate, CardField, ExtractedFields};

    fn ctx(extensions: &[String]) -> PageContext<'_> {
        PageContext {
            locale: Locale::PtBr,
            allowed_extensions: extensions,
            debug: false,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="a&b">"#),
            "&lt;img src=x onerror=&quot;a&amp;b&quot;&gt;"
        );
    }

    #[test]
    fn index_lists_accepted_extensions() {
        let extensions = vec!["png".to_string(), "jpg".to_string()];
        let html = index_page(&ctx(&extensions));
        assert!(html.contains(r#"accept=".png,.jpg""#));
        assert!(html.contains("Formatos suportados: PNG, JPG"));
        assert!(!html.contains("DEBUG"));
    }

    #[test]
    fn partial_report_renders_marks_and_banner() {
        let fields: ExtractedFields = [
            (CardField::CardNumber.as_str(), "4111 1111 1111 1111"),
            (CardField::PaymentNetwork.as_str(), "<b>VISA</b>"),
        ]
        .into_iter()
        .collect();
        let html = validation_section(Locale::PtBr, &validate(&fields));

        assert!(html.contains("Campos detectados: 2/6"));
        assert!(html.contains("&#9989; <strong>Número do Cartão:</strong> 4111 1111 1111 1111"));
        assert!(html.contains("&#10060; <strong>Nome do Titular:</strong> Não detectado"));
        assert!(html.contains("&lt;b&gt;VISA&lt;/b&gt;"));
        assert!(html.contains("Cartão parcialmente validado. 2/6 campos detectados."));
    }

    #[test]
    fn empty_report_renders_none_banner() {
        let html = validation_section(Locale::En, &validate(&ExtractedFields::new()));
        assert!(html.contains("Fields detected: 0/6"));
        assert!(html.contains(r#"class="box error""#));
        assert!(html.contains("No card information detected."));
    }
}
