//! Template helper function registry.
//!
//! A fixed set of pure helpers exposed to the template engine by name.
//! The registry is built once at startup from the site configuration and
//! injected into the engine; it is immutable afterwards. Every helper is a
//! pure function of its arguments plus the read-only request Bucket.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use serde_json::Value;

use crate::config::SiteConfig;
use crate::core::context::{keys, Bucket};
use crate::core::error::{Error, Result};

use super::html::escape;

/// A named template helper.
pub type HelperFn = Box<dyn Fn(&Bucket, &[Value]) -> Result<String> + Send + Sync>;

/// Immutable registry of template helpers, keyed by name.
pub struct FuncRegistry {
    funcs: HashMap<&'static str, HelperFn>,
}

impl FuncRegistry {
    /// Build the standard helper set for a site.
    pub fn standard(site: &Arc<SiteConfig>) -> Self {
        let mut funcs: HashMap<&'static str, HelperFn> = HashMap::new();
        let assets = site.asset_path.clone();

        {
            let assets = assets.clone();
            funcs.insert(
                "scripts",
                Box::new(move |_, args| {
                    let mut out = String::new();
                    for name in str_args(args) {
                        out.push_str(&format!(
                            "<script type=\"text/javascript\" src=\"{}/js/{}.js\"></script>",
                            assets,
                            escape(name)
                        ));
                    }
                    Ok(out)
                }),
            );
        }

        {
            let assets = assets.clone();
            funcs.insert(
                "styles",
                Box::new(move |_, args| {
                    let mut out = String::new();
                    for name in str_args(args) {
                        out.push_str(&format!(
                            "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}/css/{}.css\">",
                            assets,
                            escape(name)
                        ));
                    }
                    Ok(out)
                }),
            );
        }

        {
            let assets = assets.clone();
            funcs.insert(
                "image",
                Box::new(move |_, args| {
                    let name = str_arg(args, 0)?;
                    let class = args.get(1).and_then(Value::as_str).unwrap_or("");
                    Ok(format!(
                        "<img class=\"{}\" src=\"{}/img/{}\">",
                        escape(class),
                        assets,
                        escape(name)
                    ))
                }),
            );
        }

        // Block bodies are stored page HTML and pass through unescaped;
        // only the wrapper is generated here.
        funcs.insert(
            "content",
            Box::new(|_, args| {
                let mut out = String::new();
                for text in str_args(args) {
                    out.push_str("<div class='standard'>");
                    out.push_str(text);
                    out.push_str("</div>");
                }
                Ok(out)
            }),
        );

        funcs.insert(
            "navigation",
            Box::new(|bucket, _| {
                let items = match bucket.get("NavItems").and_then(Value::as_array) {
                    Some(items) => items,
                    None => return Ok(String::new()),
                };
                let mut out = String::from("<nav><ul>");
                for item in items {
                    let title = item.get("Title").and_then(Value::as_str).unwrap_or("");
                    let slug = item.get("Slug").and_then(Value::as_str).unwrap_or("");
                    out.push_str(&format!(
                        "<li><a href=\"/{}\">{}</a></li>",
                        escape(slug),
                        escape(title)
                    ));
                }
                out.push_str("</ul></nav>");
                Ok(out)
            }),
        );

        funcs.insert(
            "link",
            Box::new(|bucket, args| {
                let title = str_arg(args, 0)?;
                let path = str_arg(args, 1)?;
                let extra_class = args.get(2).and_then(Value::as_str).unwrap_or("");

                let current = bucket.get_str(keys::CURRENT_URL);
                let current_path = current.split('?').next().unwrap_or(current);
                let active = current_path.eq_ignore_ascii_case(path);

                let mut class = extra_class.to_string();
                if active {
                    if !class.is_empty() {
                        class.push(' ');
                    }
                    class.push_str("active");
                }

                if class.is_empty() {
                    Ok(format!("<a href=\"{}\">{}</a>", escape(path), escape(title)))
                } else {
                    Ok(format!(
                        "<a href=\"{}\" class=\"{}\">{}</a>",
                        escape(path),
                        escape(&class),
                        escape(title)
                    ))
                }
            }),
        );

        funcs.insert(
            "text_block",
            Box::new(|_, args| {
                let blocks = args.get(0).and_then(Value::as_array);
                let code = str_arg(args, 1)?;
                let blocks = match blocks {
                    Some(b) => b,
                    None => return Ok(String::new()),
                };
                for block in blocks {
                    let block_code = block.get("Code").and_then(Value::as_str).unwrap_or("");
                    if block_code == code {
                        let body = block.get("Body").and_then(Value::as_str).unwrap_or("");
                        // Body is stored page HTML, rendered as-is inside
                        // the editable wrapper.
                        return Ok(format!(
                            "<div class=\"editable\" data-code=\"{}\">{}</div>",
                            escape(code),
                            body
                        ));
                    }
                }
                Ok(String::new())
            }),
        );

        funcs.insert(
            "is_blank",
            Box::new(|_, args| {
                let text = args.get(0).and_then(Value::as_str).unwrap_or("");
                Ok(bool_str(text.trim().is_empty()))
            }),
        );

        funcs.insert(
            "gt",
            Box::new(|_, args| {
                let a = num_arg(args, 0)?;
                let b = num_arg(args, 1)?;
                Ok(bool_str(a > b))
            }),
        );

        funcs.insert(
            "format_date",
            Box::new(|_, args| {
                let value = str_arg(args, 0)?;
                let layout = str_arg(args, 1)?;
                match DateTime::parse_from_rfc3339(value) {
                    Ok(dt) => Ok(dt.format(layout).to_string()),
                    // Unparseable input renders unchanged rather than
                    // failing the whole template
                    Err(_) => Ok(value.to_string()),
                }
            }),
        );

        Self { funcs }
    }

    /// Invoke a helper by name.
    pub fn call(&self, name: &str, bucket: &Bucket, args: &[Value]) -> Result<String> {
        match self.funcs.get(name) {
            Some(f) => f(bucket, args),
            None => Err(Error::render(name, "no such template helper")),
        }
    }

    /// Whether a helper is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Names of all registered helpers.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.funcs.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

fn str_args(args: &[Value]) -> impl Iterator<Item = &str> {
    args.iter().filter_map(Value::as_str)
}

fn str_arg<'a>(args: &'a [Value], index: usize) -> Result<&'a str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::render("helper", format!("missing string argument {}", index)))
}

fn num_arg(args: &[Value], index: usize) -> Result<f64> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::render("helper", format!("missing numeric argument {}", index)))
}

fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> FuncRegistry {
        FuncRegistry::standard(&Arc::new(SiteConfig::default()))
    }

    fn call(name: &str, bucket: &Bucket, args: &[Value]) -> String {
        registry().call(name, bucket, args).unwrap()
    }

    #[test]
    fn test_standard_registry_is_complete() {
        let names = registry().names();
        assert_eq!(
            names,
            vec![
                "content",
                "format_date",
                "gt",
                "image",
                "is_blank",
                "link",
                "navigation",
                "scripts",
                "styles",
                "text_block",
            ]
        );
    }

    #[test]
    fn test_unknown_helper_errors() {
        let err = registry().call("nope", &Bucket::new(), &[]).unwrap_err();
        assert!(err.to_string().contains("no such template helper"));
    }

    #[test]
    fn test_scripts_and_styles() {
        let bucket = Bucket::new();
        assert_eq!(
            call("scripts", &bucket, &[json!("app"), json!("charts")]),
            "<script type=\"text/javascript\" src=\"/assets/js/app.js\"></script>\
             <script type=\"text/javascript\" src=\"/assets/js/charts.js\"></script>"
        );
        assert_eq!(
            call("styles", &bucket, &[json!("main")]),
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"/assets/css/main.css\">"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            call("image", &Bucket::new(), &[json!("logo.png"), json!("hero")]),
            "<img class=\"hero\" src=\"/assets/img/logo.png\">"
        );
    }

    #[test]
    fn test_content_emits_balanced_divs() {
        let out = call("content", &Bucket::new(), &[json!("<p>one</p>"), json!("two")]);
        assert_eq!(
            out,
            "<div class='standard'><p>one</p></div><div class='standard'>two</div>"
        );
        assert!(!out.contains("</standard>"));
    }

    #[test]
    fn test_navigation_absent_is_empty() {
        assert_eq!(call("navigation", &Bucket::new(), &[]), "");
    }

    #[test]
    fn test_navigation_renders_items() {
        let mut bucket = Bucket::new();
        bucket.add(
            "NavItems",
            json!([
                {"Title": "Home", "Slug": "home"},
                {"Title": "About & More", "Slug": "about"},
            ]),
        );
        assert_eq!(
            call("navigation", &bucket, &[]),
            "<nav><ul>\
             <li><a href=\"/home\">Home</a></li>\
             <li><a href=\"/about\">About &amp; More</a></li>\
             </ul></nav>"
        );
    }

    #[test]
    fn test_link_active_on_current_path() {
        let mut bucket = Bucket::new();
        bucket.add(keys::CURRENT_URL, "/Pets?page=2");

        // Case-insensitive path match, query ignored
        assert_eq!(
            call("link", &bucket, &[json!("Pets"), json!("/pets")]),
            "<a href=\"/pets\" class=\"active\">Pets</a>"
        );
        assert_eq!(
            call("link", &bucket, &[json!("Owners"), json!("/owners")]),
            "<a href=\"/owners\">Owners</a>"
        );
        assert_eq!(
            call(
                "link",
                &bucket,
                &[json!("Pets"), json!("/pets"), json!("nav-item")]
            ),
            "<a href=\"/pets\" class=\"nav-item active\">Pets</a>"
        );
    }

    #[test]
    fn test_text_block_linear_scan() {
        let blocks = json!([
            {"Code": "intro", "Body": "<p>Welcome</p>"},
            {"Code": "footer", "Body": "<p>Bye</p>"},
            {"Code": "intro", "Body": "<p>Shadowed</p>"},
        ]);

        // First match wins
        assert_eq!(
            call("text_block", &Bucket::new(), &[blocks.clone(), json!("intro")]),
            "<div class=\"editable\" data-code=\"intro\"><p>Welcome</p></div>"
        );
        assert_eq!(
            call("text_block", &Bucket::new(), &[blocks, json!("missing")]),
            ""
        );
    }

    #[test]
    fn test_is_blank() {
        let bucket = Bucket::new();
        assert_eq!(call("is_blank", &bucket, &[json!("")]), "true");
        assert_eq!(call("is_blank", &bucket, &[json!("   ")]), "true");
        assert_eq!(call("is_blank", &bucket, &[json!("x")]), "false");
        assert_eq!(call("is_blank", &bucket, &[]), "true");
    }

    #[test]
    fn test_gt() {
        let bucket = Bucket::new();
        assert_eq!(call("gt", &bucket, &[json!(3), json!(2)]), "true");
        assert_eq!(call("gt", &bucket, &[json!(2), json!(2)]), "false");
        assert!(registry().call("gt", &bucket, &[json!("x")]).is_err());
    }

    #[test]
    fn test_format_date() {
        let bucket = Bucket::new();
        assert_eq!(
            call(
                "format_date",
                &bucket,
                &[json!("2026-08-25T10:30:00Z"), json!("%d %b %Y")]
            ),
            "25 Aug 2026"
        );
        // Unparseable input passes through
        assert_eq!(
            call("format_date", &bucket, &[json!("soon"), json!("%Y")]),
            "soon"
        );
    }
}
