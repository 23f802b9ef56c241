// Rasterizes a `proximity_vision` display list onto an OpenCV BGR frame.

use opencv::{
    core::{self, Mat, Scalar, Vector},
    imgproc,
    prelude::*,
};
use proximity_vision::{Fill, Overlay, Point, Primitive, Rgb, TextAlign};

const FONT: i32 = imgproc::FONT_HERSHEY_SIMPLEX;

fn to_cv_point(p: Point) -> core::Point {
    core::Point::new(p.x, p.y)
}

/// OpenCV frames are BGR.
fn to_bgr(color: Rgb) -> Scalar {
    Scalar::new(color.b() as f64, color.g() as f64, color.r() as f64, 0.0)
}

fn thickness_of(fill: Fill) -> i32 {
    match fill {
        Fill::Solid => imgproc::FILLED,
        Fill::Outline(thickness) => thickness,
    }
}

/// Paints every primitive of `overlay` onto `frame`, in order.
pub fn draw_overlay(frame: &mut Mat, overlay: &Overlay) -> opencv::Result<()> {
    for primitive in overlay {
        draw_primitive(frame, primitive)?;
    }
    Ok(())
}

fn draw_primitive(frame: &mut Mat, primitive: &Primitive) -> opencv::Result<()> {
    match primitive {
        Primitive::Line {
            from,
            to,
            color,
            thickness,
        } => imgproc::line(
            frame,
            to_cv_point(*from),
            to_cv_point(*to),
            to_bgr(*color),
            *thickness,
            imgproc::LINE_8,
            0,
        ),
        Primitive::Rectangle {
            top_left,
            bottom_right,
            color,
            fill,
        } => imgproc::rectangle_points(
            frame,
            to_cv_point(*top_left),
            to_cv_point(*bottom_right),
            to_bgr(*color),
            thickness_of(*fill),
            imgproc::LINE_8,
            0,
        ),
        Primitive::Circle {
            center,
            radius,
            color,
            fill,
        } => imgproc::circle(
            frame,
            to_cv_point(*center),
            (*radius).max(0),
            to_bgr(*color),
            thickness_of(*fill),
            imgproc::LINE_8,
            0,
        ),
        Primitive::Polyline {
            points,
            closed,
            color,
            thickness,
        } => {
            let mut contours = Vector::<Vector<core::Point>>::new();
            contours.push(points.iter().copied().map(to_cv_point).collect());
            imgproc::polylines(
                frame,
                &contours,
                *closed,
                to_bgr(*color),
                *thickness,
                imgproc::LINE_8,
                0,
            )
        }
        Primitive::Text {
            text,
            origin,
            align,
            scale,
            color,
            thickness,
        } => {
            let mut origin = to_cv_point(*origin);
            if *align != TextAlign::Left {
                let mut baseline = 0;
                let size = imgproc::get_text_size(text, FONT, *scale, *thickness, &mut baseline)?;
                origin.x = align.left_edge(origin.x, size.width);
            }
            imgproc::put_text(
                frame,
                text,
                origin,
                FONT,
                *scale,
                to_bgr(*color),
                *thickness,
                imgproc::LINE_8,
                false,
            )
        }
    }
}
