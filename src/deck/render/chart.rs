use super::{RenderContext, RenderedShape, describe};
use crate::ooxml::pptx::{ChartKind, ChartPart, ChartSeries, LegendPosition, MutableSlide};
use crate::plan::{ChartData, Element};
use log::warn;

pub(super) fn render(
    ctx: &RenderContext<'_>,
    slide: &mut MutableSlide,
    element: &Element,
    chart_type: Option<&str>,
    title: Option<&str>,
    data: &ChartData,
) -> Option<RenderedShape> {
    let theme = ctx.mapper.theme();
    let style = &element.style;

    let kind = match chart_type {
        Some(name) => ChartKind::parse(name).unwrap_or_else(|| {
            warn!("Unsupported chart type '{}', using column chart", name);
            ChartKind::Column
        }),
        None => ChartKind::Column,
    };

    let mut chart = ChartPart::new(kind);
    chart.title = title.filter(|t| !t.trim().is_empty()).map(String::from);

    if kind == ChartKind::Pie {
        // Pie data comes as labels/values; category/series data is accepted too.
        let (labels, values) = if !data.values.is_empty() {
            (&data.labels, &data.values)
        } else {
            match data.series.first() {
                Some(series) => (&data.categories, &series.values),
                None => (&data.labels, &data.values),
            }
        };
        if labels.is_empty() || values.is_empty() {
            warn!("Pie chart without labels or values, skipping {}", describe(element));
            return None;
        }
        chart.categories = labels.clone();
        chart.series = vec![ChartSeries {
            name: title.unwrap_or_default().to_string(),
            values: values.clone(),
            color: None,
        }];
        chart.point_colors = (0..labels.len()).map(|i| theme.chart_color(i)).collect();
    } else {
        if data.categories.is_empty() || data.series.is_empty() {
            warn!(
                "Chart without categories or series, skipping {}",
                describe(element)
            );
            return None;
        }
        chart.categories = data.categories.clone();
        chart.series = data
            .series
            .iter()
            .enumerate()
            .map(|(i, series)| ChartSeries {
                name: series.name.clone(),
                values: series.values.clone(),
                color: Some(theme.chart_color(i)),
            })
            .collect();
    }

    chart.data_labels = style.data_labels.unwrap_or(false);
    chart.legend = style.legend_position.as_deref().map(|position| {
        LegendPosition::parse(position).unwrap_or_else(|| {
            warn!("Unsupported legend position '{}', using right", position);
            LegendPosition::Right
        })
    });
    chart.text_color = Some(ctx.mapper.resolve_color(style.color.as_deref(), theme.text));
    chart.axis_color = Some(theme.text);
    chart.font = Some(ctx.mapper.resolve_font(style, "body"));

    Some(slide.add_chart(chart, ctx.mapper.transform(element)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{element, with_context};
    use super::*;
    use crate::deck::theme::ResolvedTheme;
    use crate::ooxml::pptx::{MutablePresentation, ShapeKind};
    use crate::plan::{ElementKind, ElementStyle, SeriesData};

    fn chart_element(chart_type: &str, data: ChartData, style: ElementStyle) -> Element {
        element(
            ElementKind::Chart {
                chart_type: Some(chart_type.into()),
                title: Some("Sales".into()),
                data,
            },
            style,
        )
    }

    #[test]
    fn test_series_colors_cycle_through_theme() {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let data = ChartData {
            categories: vec!["Q1".into(), "Q2".into()],
            series: (0..9)
                .map(|i| SeriesData {
                    name: format!("S{}", i),
                    values: vec![1.0, 2.0],
                })
                .collect(),
            ..Default::default()
        };
        let style = ElementStyle {
            data_labels: Some(true),
            legend_position: Some("corner".into()),
            ..Default::default()
        };
        let el = chart_element("bar_chart", data.clone(), style);

        let shape = with_context(&theme, |ctx| {
            render(ctx, slide, &el, Some("bar_chart"), Some("Sales"), &data)
        })
        .unwrap();
        assert_eq!(shape.kind, ShapeKind::Chart);

        let chart = &slide.charts[0];
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.series[0].color, Some(theme.primary));
        assert_eq!(chart.series[8].color, Some(theme.primary));
        assert_eq!(chart.series[3].color, Some(theme.chart_colors[3]));
        assert_eq!(chart.legend, Some(LegendPosition::TopRight));
        assert!(chart.data_labels);
    }

    #[test]
    fn test_pie_slices_and_missing_legend() {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let data = ChartData {
            labels: vec!["A".into(), "B".into(), "C".into()],
            values: vec![30.0, 50.0, 20.0],
            ..Default::default()
        };
        let el = chart_element("pie_chart", data.clone(), ElementStyle::default());

        with_context(&theme, |ctx| {
            render(ctx, slide, &el, Some("pie_chart"), Some("Sales"), &data)
        })
        .unwrap();
        let chart = &slide.charts[0];
        assert_eq!(chart.point_colors, vec![theme.primary, theme.secondary, theme.accent]);
        assert_eq!(chart.series[0].name, "Sales");
        assert_eq!(chart.legend, None);
    }

    #[test]
    fn test_missing_data_skips_element() {
        let theme = ResolvedTheme::default();
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        let data = ChartData {
            categories: vec!["Q1".into()],
            ..Default::default()
        };
        let el = chart_element("line_chart", data.clone(), ElementStyle::default());
        let rendered = with_context(&theme, |ctx| {
            render(ctx, slide, &el, Some("line_chart"), None, &data)
        });
        assert!(rendered.is_none());
        assert_eq!(slide.shape_count(), 0);
    }
}
