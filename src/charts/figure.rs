//! plotly building blocks shared by the dashboard charts.

use plotly::color::NamedColor;
use plotly::common::{DashType, Mode, Title};
use plotly::layout::{Axis, Shape, ShapeLayer, ShapeLine, ShapeType};
use plotly::{Layout, Scatter};

const CUTOFF_LINE_WIDTH: f64 = 2.0;
const FORECAST_BAND_OPACITY: f64 = 0.2;

/// Line trace over string labels. Missing values serialize as `null`,
/// which plotly draws as gaps.
pub fn line_trace(
    name: Option<&str>,
    x: Vec<String>,
    y: Vec<Option<f64>>,
) -> Box<Scatter<String, Option<f64>>> {
    let trace = Scatter::new(x, y).mode(Mode::Lines);
    match name {
        Some(name) => trace.name(name),
        None => trace,
    }
}

pub fn titled_layout(title: String, y_title: &str) -> Layout {
    Layout::new()
        .title(Title::with_text(title))
        .x_axis(Axis::new().title(Title::with_text("Date")))
        .y_axis(Axis::new().title(Title::with_text(y_title)))
}

/// Dashed red marker spanning the full plot height at `x`.
pub fn cutoff_line(x: String) -> Shape {
    Shape::new()
        .shape_type(ShapeType::Line)
        .x_ref("x")
        .y_ref("paper")
        .x0(x.clone())
        .x1(x)
        .y0(0.0)
        .y1(1.0)
        .line(
            ShapeLine::new()
                .color(NamedColor::Red)
                .width(CUTOFF_LINE_WIDTH)
                .dash(DashType::Dash),
        )
}

/// Borderless grey band drawn beneath the traces from `x0` to `x1`.
pub fn forecast_band(x0: String, x1: String) -> Shape {
    Shape::new()
        .shape_type(ShapeType::Rect)
        .x_ref("x")
        .y_ref("paper")
        .x0(x0)
        .x1(x1)
        .y0(0.0)
        .y1(1.0)
        .fill_color(NamedColor::Grey)
        .opacity(FORECAST_BAND_OPACITY)
        .layer(ShapeLayer::Below)
        .line(ShapeLine::new().width(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_serializes_missing_as_null() {
        let trace = line_trace(
            Some("PoS"),
            vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            vec![Some(1.5), None],
        );
        let value = serde_json::to_value(&trace).unwrap();

        assert_eq!(value["type"], "scatter");
        assert_eq!(value["mode"], "lines");
        assert_eq!(value["name"], "PoS");
        assert_eq!(value["x"], json!(["2024-01-01", "2024-01-02"]));
        assert_eq!(value["y"], json!([1.5, null]));
    }

    #[test]
    fn test_unnamed_trace_has_no_name() {
        let trace = line_trace(None, vec!["a".to_string()], vec![Some(1.0)]);
        let value = serde_json::to_value(&trace).unwrap();

        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_cutoff_line_is_dashed_and_full_height() {
        let value = serde_json::to_value(cutoff_line("2024-01-01 06:00:00".to_string())).unwrap();

        assert_eq!(value["type"], "line");
        assert_eq!(value["x0"], "2024-01-01 06:00:00");
        assert_eq!(value["x1"], "2024-01-01 06:00:00");
        assert_eq!(value["yref"], "paper");
        assert_eq!(value["line"]["dash"], "dash");
        assert_eq!(value["line"]["color"], "red");
        assert_eq!(value["line"]["width"], 2.0);
    }

    #[test]
    fn test_band_has_no_border() {
        let value = serde_json::to_value(forecast_band("a".to_string(), "b".to_string())).unwrap();

        assert_eq!(value["type"], "rect");
        assert_eq!(value["line"], json!({ "width": 0.0 }));
        assert_eq!(value["opacity"], 0.2);
        assert_eq!(value["fillcolor"], "grey");
        assert_eq!(value["layer"], "below");
    }
}
