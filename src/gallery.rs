//! Static HTML page comparing rendered variants side by side.

use crate::score::LumaStats;

/// One rendered variant as shown in the gallery.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GalleryItem {
    pub slug: String,
    pub params: serde_json::Value,
    pub score: f64,
    pub stats: Option<LumaStats>,
    /// Whether `previews/<slug>.gif` was rendered.
    pub has_gif: bool,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn meta_line(item: &GalleryItem) -> String {
    match &item.stats {
        Some(s) => format!(
            "Yavg {:.1}% | Ymin {:.1}% | Ymax {:.1}% | score {:.3}",
            s.avg * 100.0,
            s.min * 100.0,
            s.max * 100.0,
            item.score
        ),
        None => format!("score {:.3}", item.score),
    }
}

/// Slug of the highest-scoring item; ties keep the earliest.
pub fn best_slug(items: &[GalleryItem]) -> Option<&str> {
    items
        .iter()
        .fold(None::<&GalleryItem>, |best, it| match best {
            Some(b) if b.score >= it.score => Some(b),
            _ => Some(it),
        })
        .map(|it| it.slug.as_str())
}

const STYLE: &str = r#"      :root { color-scheme: dark; }
      body { margin: 0; font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, sans-serif; background: #070a12; color: #e5e7eb; }
      header.top { padding: 18px 22px; position: sticky; top: 0; background: rgba(7,10,18,0.85); border-bottom: 1px solid rgba(255,255,255,0.08); }
      header.top h1 { margin: 0; font-size: 16px; font-weight: 700; }
      header.top .hint { margin-top: 6px; font-size: 13px; color: rgba(229,231,235,0.72); }
      main { padding: 18px 22px 50px; }
      .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(340px, 1fr)); gap: 18px; align-items: start; }
      .card { border: 1px solid rgba(255,255,255,0.09); border-radius: 14px; background: rgba(255,255,255,0.03); overflow: hidden; }
      .card header { padding: 12px 14px; border-bottom: 1px solid rgba(255,255,255,0.08); }
      .slug { font-weight: 800; font-size: 13px; letter-spacing: 0.5px; text-transform: uppercase; }
      .meta { margin-top: 6px; font-size: 12px; color: rgba(229,231,235,0.70); }
      img { display: block; width: 100%; height: auto; background: #05070d; }
      details { padding: 10px 14px 14px; }
      summary { cursor: pointer; font-size: 12px; color: rgba(229,231,235,0.78); }
      details img { margin-top: 10px; border-radius: 10px; }
      pre { margin: 10px 0 0; font-size: 12px; white-space: pre-wrap; word-break: break-word; }
      .best { outline: 2px solid rgba(125, 211, 252, 0.75); box-shadow: 0 0 0 6px rgba(125, 211, 252, 0.08); }
"#;

/// Render the gallery page. Image paths are relative to the page: `./previews/<slug>.*`.
pub fn render_gallery(title: &str, items: &[GalleryItem]) -> String {
    let best = best_slug(items);
    let mut cards = String::new();
    for it in items {
        let slug = escape_html(&it.slug);
        let class = if Some(it.slug.as_str()) == best {
            "card best"
        } else {
            "card"
        };
        let params = serde_json::to_string_pretty(&it.params).unwrap_or_default();
        let main_img = if it.has_gif {
            format!(r#"<img loading="lazy" src="./previews/{slug}.gif" alt="{slug} animation" />"#)
        } else {
            format!(r#"<img loading="lazy" src="./previews/{slug}.still.png" alt="{slug} still" />"#)
        };
        cards.push_str(&format!(
            r#"
        <article class="{class}">
          <header>
            <div class="slug">{slug}</div>
            <div class="meta">{meta}</div>
          </header>
          {main_img}
          <details>
            <summary>still + params</summary>
            <img loading="lazy" src="./previews/{slug}.still.png" alt="{slug} still" />
            <pre>{params}</pre>
          </details>
        </article>
"#,
            meta = escape_html(&meta_line(it)),
            params = escape_html(&params),
        ));
    }

    let title = escape_html(title);
    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <style>
{STYLE}    </style>
  </head>
  <body>
    <header class="top">
      <h1>{title}</h1>
      <div class="hint">Each preview is a short animated loop. Open a card for a still and the exact params used. The best-scored variant is highlighted.</div>
    </header>
    <main>
      <section class="grid">{cards}      </section>
    </main>
  </body>
</html>
"#
    )
}
