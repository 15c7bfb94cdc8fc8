//! HTML views
//!
//! Templates are plain HTML files with `{{ name }}` placeholders. They are read
//! from disk on every render so edits show up without a restart.

use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

pub const INDEX_TEMPLATE: &str = "index.html";
pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";

/// Query parameters forwarded into the dashboard, in display order
pub const DASHBOARD_FIELDS: [&str; 7] = [
    "lights",
    "T_in",
    "RH_in",
    "T_out",
    "Windspeed",
    "predicted_consumption",
    "suggestion",
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {name} not found in {dir}")]
    NotFound { name: String, dir: PathBuf },

    #[error("failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Log whether the templates directory and each known template exist
    pub fn report(&self) {
        let dir = self.dir.display();
        if !self.dir.is_dir() {
            error!(templates_dir = %dir, "templates folder not found");
            return;
        }
        info!(templates_dir = %dir, "templates folder found");

        for name in [INDEX_TEMPLATE, DASHBOARD_TEMPLATE] {
            let path = self.dir.join(name);
            if path.is_file() {
                info!(template = name, "template found");
            } else {
                error!(template = name, path = %path.display(), "template not found");
            }
        }
    }

    pub async fn render(
        &self,
        name: &str,
        context: &[(&str, &str)],
    ) -> Result<String, TemplateError> {
        let path = self.dir.join(name);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound {
                    name: name.to_string(),
                    dir: self.dir.clone(),
                })
            }
            Err(source) => {
                return Err(TemplateError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        Ok(substitute(&source, context))
    }
}

/// Replace `{{ key }}` placeholders with escaped values. Unknown keys render
/// empty; an unterminated `{{` is kept verbatim.
pub fn substitute(template: &str, context: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        if let Some((_, value)) = context.iter().find(|(k, _)| *k == key) {
            out.push_str(&escape_html(value));
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_substitute_placeholders() {
        let out = substitute(
            "<p>{{ lights }} / {{T_in}} / {{ missing }}</p>",
            &[("lights", "10"), ("T_in", "21.5")],
        );
        assert_eq!(out, "<p>10 / 21.5 / </p>");
    }

    #[test]
    fn test_substitute_escapes_values() {
        let out = substitute("{{ suggestion }}", &[("suggestion", "<b>\"save\" & 'go'</b>")]);
        assert_eq!(out, "&lt;b&gt;&#34;save&#34; &amp; &#39;go&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        assert_eq!(substitute("a {{ b", &[("b", "x")]), "a {{ b");
    }

    #[tokio::test]
    async fn test_render_reads_from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), "<h1>{{ title }}</h1>").unwrap();

        let store = TemplateStore::new(dir.path());
        let html = store.render("page.html", &[("title", "Hi")]).await.unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_render_missing_template() {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path());

        let err = store.render(INDEX_TEMPLATE, &[]).await.unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
        assert!(err.to_string().starts_with("template index.html not found"));
    }
}
