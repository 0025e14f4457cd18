use crate::models::Quantity;
use crate::utils::constants::PLOTLY_JS_URL;
use serde_json::json;

/// A dashboard page: a dropdown over quantities and one or more charts that
/// are redrawn from a JSON endpoint whenever the selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Historical,
    Prediction,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Historical, Page::Prediction];

    pub fn name(&self) -> &'static str {
        match self {
            Page::Historical => "Historical",
            Page::Prediction => "Prediction",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Historical => "/",
            Page::Prediction => "/prediction",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Page::Historical => "/api/historical",
            Page::Prediction => "/api/prediction",
        }
    }

    /// Graph element ids, each paired with the key of its figure in the
    /// endpoint response (`None` when the response is the figure itself).
    fn graphs(&self) -> &'static [(&'static str, Option<&'static str>)] {
        match self {
            Page::Historical => &[
                ("daily-graph", Some("daily")),
                ("weekly-graph", Some("weekly")),
                ("monthly-graph", Some("monthly")),
            ],
            Page::Prediction => &[("prediction-graph", None)],
        }
    }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>__TITLE__</title>
<script src="__PLOTLY__"></script>
<style>
  body { font-family: sans-serif; margin: 1.5rem; }
  nav a { margin-right: 0.5rem; }
  select { min-width: 16rem; margin: 0.5rem 0 1rem; }
  .graph { height: 420px; }
</style>
</head>
<body>
<nav>__NAV__</nav>
<h1>Weather Data Visualization</h1>
<div>Select weather data to plot:</div>
<select id="weather-data-dropdown">__OPTIONS__</select>
__GRAPHS__
<script>
const config = __CONFIG__;
const dropdown = document.getElementById("weather-data-dropdown");

async function redraw() {
  const response = await fetch(config.endpoint + "/" + encodeURIComponent(dropdown.value));
  const body = await response.json();
  if (!response.ok) {
    console.error(body.error);
    return;
  }
  for (const [id, key] of config.graphs) {
    const figure = key === null ? body : body[key];
    Plotly.react(id, figure.data, figure.layout);
  }
}

dropdown.addEventListener("change", redraw);
redraw();
</script>
</body>
</html>
"#;

/// Renders the page with `options` in the dropdown, preselecting Temperature
/// when offered.
pub fn render(page: Page, options: &[Quantity]) -> String {
    let default = options
        .iter()
        .copied()
        .find(|q| *q == Quantity::Temperature)
        .or_else(|| options.first().copied());

    let nav = Page::ALL
        .iter()
        .map(|p| format!(r#"<a href="{}">{}</a>"#, p.path(), p.name()))
        .collect::<Vec<_>>()
        .join(" | ");

    let option_tags: String = options
        .iter()
        .map(|q| {
            let selected = if Some(*q) == default { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, q.name(), selected)
        })
        .collect();

    let graphs: String = page
        .graphs()
        .iter()
        .map(|(id, _)| format!(r#"<div id="{}" class="graph"></div>"#, id))
        .collect::<Vec<_>>()
        .join("\n");

    let config = json!({
        "endpoint": page.endpoint(),
        "graphs": page.graphs(),
    });

    TEMPLATE
        .replace("__TITLE__", &format!("{} | Weather Data", page.name()))
        .replace("__PLOTLY__", PLOTLY_JS_URL)
        .replace("__NAV__", &nav)
        .replace("__OPTIONS__", &option_tags)
        .replace("__GRAPHS__", &graphs)
        .replace("__CONFIG__", &config.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_historical_page_has_three_graphs_and_all_options() {
        let html = render(Page::Historical, &Quantity::ALL);

        for id in ["daily-graph", "weekly-graph", "monthly-graph"] {
            assert!(html.contains(&format!(r#"<div id="{}""#, id)));
        }
        for quantity in Quantity::ALL {
            assert!(html.contains(&format!(r#"value="{}""#, quantity.name())));
        }
        assert!(html.contains(r#"<option value="Temperature" selected>"#));
        assert!(!html.contains(r#"value="Station""#));
        assert!(!html.contains(r#"value="Date""#));
        assert!(html.contains(r#""endpoint":"/api/historical""#));
    }

    #[test]
    fn test_prediction_page_defaults_to_first_option_without_temperature() {
        let html = render(Page::Prediction, &[Quantity::Humidity, Quantity::Pm10]);

        assert!(html.contains(r#"<option value="Humidity" selected>"#));
        assert!(html.contains(r#"<div id="prediction-graph""#));
        assert!(!html.contains("daily-graph"));
        assert!(html.contains(r#"["prediction-graph",null]"#));
    }

    #[test]
    fn test_navigation_links_both_pages() {
        let html = render(Page::Prediction, &[]);
        assert!(html.contains(r#"<a href="/">Historical</a> | <a href="/prediction">Prediction</a>"#));
        assert!(!html.contains("selected"));
    }
}
