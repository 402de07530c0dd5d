//! SVG output for a [`Scene`] through plotters' SVG backend.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::scene::{Anchor, Point, Primitive, Scene};
use super::series::Rgb;
use super::ChartError;

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Plotters' SVG backend writes `font-size` as the requested size divided
/// by this factor.
const SVG_FONT_SCALE: f64 = 1.24;

fn coord(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Render the scene into a standalone SVG document.
///
/// The root element carries `id="<container_id>"` so the output can be
/// located the way a page container would be.
pub fn render_svg(scene: &Scene) -> Result<String, ChartError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (scene.width, scene.height))
            .into_drawing_area();

        if let Some(bg) = scene.background {
            root.fill(&RGBColor::from(bg)).map_err(draw_err)?;
        }

        for primitive in &scene.primitives {
            draw_primitive(&root, primitive)?;
        }

        root.present().map_err(draw_err)?;
    }

    let tagged = buf.replacen("<svg ", &format!("<svg id=\"{}\" ", scene.container_id), 1);
    Ok(tagged)
}

fn draw_primitive(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    primitive: &Primitive,
) -> Result<(), ChartError> {
    match primitive {
        Primitive::Path { points, stroke, stroke_width, .. } => {
            let style = RGBColor::from(*stroke).stroke_width(stroke_width.round().max(1.0) as u32);
            let pts: Vec<(i32, i32)> = points.iter().copied().map(coord).collect();
            root.draw(&PathElement::new(pts, style)).map_err(draw_err)?;
        }
        Primitive::Marker { center, radius, fill, stroke, .. } => {
            let r = radius.round().max(1.0) as u32;
            root.draw(&Circle::new(coord(*center), r, RGBColor::from(*fill).filled()))
                .map_err(draw_err)?;
            if fill != stroke {
                root.draw(&Circle::new(coord(*center), r, RGBColor::from(*stroke).stroke_width(1)))
                    .map_err(draw_err)?;
            }
        }
        Primitive::Line { from, to, stroke, .. } => {
            let style = RGBColor::from(*stroke).stroke_width(1);
            root.draw(&PathElement::new(vec![coord(*from), coord(*to)], style))
                .map_err(draw_err)?;
        }
        Primitive::Label { text, at, anchor, size, color } => {
            let pos = match anchor {
                Anchor::TopCenter => Pos::new(HPos::Center, VPos::Top),
                Anchor::MiddleRight => Pos::new(HPos::Right, VPos::Center),
            };
            let style = ("sans-serif", *size * SVG_FONT_SCALE)
                .into_font()
                .color(&RGBColor::from(*color))
                .pos(pos);
            root.draw(&Text::new(text.clone(), coord(*at), style))
                .map_err(draw_err)?;
        }
    }
    Ok(())
}
