//! HTML chart pages with D3.js visualizations

use super::charts::ChartPage;
use std::io::{self, Write};

// One template drives every chart kind; the page script dispatches on `kind`.
const CHART_HTML: &str = include_str!("chart.html");

pub fn write<W: Write>(writer: &mut W, page: &ChartPage) -> io::Result<()> {
    let html = render(page)?;
    writer.write_all(html.as_bytes())
}

/// Fill the chart template for one page
pub fn render(page: &ChartPage) -> io::Result<String> {
    let json = serde_json::to_string(page)?;

    Ok(CHART_HTML
        .replace("{{TITLE}}", &html_escape(&page.title))
        .replace("{{CHART_JSON}}", &script_safe(&json)))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Keep titles like "</script>" from closing the inline script
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::charts::{BarDatum, ChartData};

    fn page(title: &str, bar_title: &str) -> ChartPage {
        ChartPage {
            kind: "bar",
            title: title.to_string(),
            x_label: "IMDb".to_string(),
            y_label: "Title".to_string(),
            data: ChartData::Bars(vec![BarDatum {
                title: bar_title.to_string(),
                score: 8.4,
            }]),
        }
    }

    // ==========================================================================
    // TEMPLATE TESTS
    // ==========================================================================
    //
    // The template must define a drawing routine for every chart kind the
    // Rust side can emit, and call it on load.
    // ==========================================================================

    #[test]
    fn test_template_defines_every_kind() {
        for f in ["function drawBar(", "function drawScatter(", "function drawHistogram(", "function drawWordCloud("] {
            assert!(CHART_HTML.contains(f), "template should define {}", f);
        }
        for kind in ["bar:", "scatter:", "histogram:", "wordcloud:"] {
            assert!(CHART_HTML.contains(kind), "template should dispatch {}", kind);
        }
    }

    #[test]
    fn test_render_fills_placeholders() {
        let html = render(&page("Top 10 Recommendations - Popular", "Heat")).unwrap();
        assert!(!html.contains("{{TITLE}}"));
        assert!(!html.contains("{{CHART_JSON}}"));
        assert!(html.contains("<title>Top 10 Recommendations - Popular</title>"));
        assert!(html.contains(r#""kind":"bar""#));
        assert!(html.contains(r#""title":"Heat""#));
    }

    #[test]
    fn test_render_escapes_title() {
        let html = render(&page("Critic's Pick <b>", "x")).unwrap();
        assert!(html.contains("Critic&#39;s Pick &lt;b&gt;"));
    }

    #[test]
    fn test_render_keeps_script_intact() {
        let html = render(&page("t", "</script><script>alert(1)")).unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script>"));
    }

    #[test]
    fn test_write_matches_render() {
        let p = page("t", "x");
        let mut out = Vec::new();
        write(&mut out, &p).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), render(&p).unwrap());
    }
}
