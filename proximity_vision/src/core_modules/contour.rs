// THEORY:
// The `contour` module is the spatial grouping stage. It takes the cleaned binary mask
// and answers one question: "where is the biggest thing that looks like a hand?"
//
// Algorithm steps:
// 1.  **Component Discovery**: A raster scan finds the first unvisited foreground
//     pixel. An 8-connected flood fill claims the whole component so it is
//     never traced twice. Because the scan is in raster order, the seed is always the
//     top-most, left-most pixel of its component, which is guaranteed to sit on the
//     outer border with background to its west.
// 2.  **Border Following**: From that seed a Moore-neighbour trace walks the outer
//     border clockwise (in image coordinates, y pointing down). At each step the eight
//     neighbours are searched clockwise starting just after the last background pixel
//     seen. The walk stops when it is about to repeat its very first move, which also
//     handles one pixel wide strands that are walked out and back.
// 3.  **Compression**: Runs of identical steps are collapsed to their endpoints so a
//     straight edge is stored as two vertices.
// 4.  **Measurement**: Area and the first order moments are computed on the polygon
//     through pixel centres with Green's theorem. A filled n x n square therefore has
//     area (n - 1)^2, and a one pixel wide line has area zero and no centroid.
//
// Holes inside a component are not traced. They can never be larger than the outer
// border that encloses them, so they cannot win the "largest contour" selection.

use image::GrayImage;

/// Clockwise neighbour offsets in image coordinates, starting east.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;

/// A pixel coordinate. Signed so that offsets and overlay geometry can leave the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Raw spatial moments of a polygon, up to first order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// The centre of mass, truncated toward zero. `None` for a degenerate polygon.
    pub fn centroid(&self) -> Option<Point> {
        if self.m00 == 0.0 {
            return None;
        }
        Some(Point::new(
            (self.m10 / self.m00) as i32,
            (self.m01 / self.m00) as i32,
        ))
    }
}

/// The outer border of one connected foreground region, as a closed polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Absolute enclosed area (shoelace formula).
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    /// Polygon moments, oriented so that `m00` is never negative.
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let mut a = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (x0, y0, x1, y1) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a += cross;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }

        let sign = if a < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a / 2.0,
            m10: sign * cx / 6.0,
            m01: sign * cy / 6.0,
        }
    }
}

/// Finds the outer contour of every 8-connected foreground region in `mask`.
/// Contours are returned in raster order of their top-left-most pixel.
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let mut visited = vec![false; width as usize * height as usize];
    let mut contours = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if visited[pixel_index(width, x, y)] || !is_foreground(mask, x as i32, y as i32) {
                continue;
            }

            flood_component(mask, &mut visited, x, y);
            let start = Point::new(x as i32, y as i32);
            contours.push(Contour::new(compress(trace_border(mask, start))));
        }
    }

    contours
}

/// Returns the contour with the greatest area. Ties go to the earliest contour.
pub fn largest(contours: &[Contour]) -> Option<&Contour> {
    let mut best: Option<(&Contour, f64)> = None;
    for contour in contours {
        let area = contour.area();
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((contour, area)),
        }
    }
    best.map(|(contour, _)| contour)
}

/// Row-major offset of (x, y), computed in `usize` so large frames cannot wrap `u32`.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[inline]
fn is_foreground(mask: &GrayImage, x: i32, y: i32) -> bool {
    x >= 0
        && y >= 0
        && (x as u32) < mask.width()
        && (y as u32) < mask.height()
        && mask.get_pixel(x as u32, y as u32).0[0] != 0
}

/// Marks every pixel 8-connected to (x, y) as visited.
fn flood_component(mask: &GrayImage, visited: &mut [bool], x: u32, y: u32) {
    let width = mask.width();
    let mut queue = vec![(x, y)];
    visited[pixel_index(width, x, y)] = true;

    while let Some((cx, cy)) = queue.pop() {
        for (dx, dy) in DIRECTIONS {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if !is_foreground(mask, nx, ny) {
                continue;
            }
            let index = pixel_index(width, nx as u32, ny as u32);
            if !visited[index] {
                visited[index] = true;
                queue.push((nx as u32, ny as u32));
            }
        }
    }
}

fn direction_of(dx: i32, dy: i32) -> usize {
    DIRECTIONS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(WEST)
}

/// One Moore-neighbour step. `back` is the direction from `current` to the last
/// background pixel examined. Returns the next border pixel and the new back direction.
fn next_border_pixel(mask: &GrayImage, current: Point, back: usize) -> Option<(Point, usize)> {
    for k in 1..=8 {
        let d = (back + k) % 8;
        let (dx, dy) = DIRECTIONS[d];
        let candidate = current.offset(dx, dy);
        if is_foreground(mask, candidate.x, candidate.y) {
            let (bx, by) = DIRECTIONS[(d + 7) % 8];
            let new_back = direction_of(bx - dx, by - dy);
            return Some((candidate, new_back));
        }
    }
    None
}

fn trace_border(mask: &GrayImage, start: Point) -> Vec<Point> {
    let limit = 4 * (mask.width() as usize * mask.height() as usize) + 8;
    let mut border = Vec::new();
    let mut current = start;
    let mut back = WEST;
    let mut first_move: Option<Point> = None;

    loop {
        let Some((next, new_back)) = next_border_pixel(mask, current, back) else {
            // Isolated pixel.
            border.push(current);
            break;
        };

        match first_move {
            Some(first) if current == start && next == first => break,
            None => first_move = Some(next),
            _ => {}
        }

        border.push(current);
        if border.len() > limit {
            log::warn!("border trace from {start:?} did not close, truncating");
            break;
        }
        current = next;
        back = new_back;
    }

    border
}

/// Drops every vertex whose incoming and outgoing steps point the same way.
fn compress(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            (here.x - prev.x, here.y - prev.y) != (next.x - here.x, next.y - here.y)
        })
        .map(|i| points[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill_rect(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        let mask = GrayImage::new(16, 16);
        assert!(find_contours(&mask).is_empty());
        assert!(largest(&[]).is_none());
    }

    #[test]
    fn square_is_traced_clockwise_to_four_corners() {
        let mut mask = GrayImage::new(20, 20);
        fill_rect(&mut mask, 3, 4, 10, 10);

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].points,
            vec![
                Point::new(3, 4),
                Point::new(12, 4),
                Point::new(12, 13),
                Point::new(3, 13),
            ]
        );
        assert_eq!(contours[0].area(), 81.0);
    }

    #[test]
    fn square_touching_the_frame_edge_is_closed() {
        let mut mask = GrayImage::new(10, 10);
        fill_rect(&mut mask, 0, 0, 10, 10);
        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 81.0);
    }

    #[test]
    fn centroid_of_square_is_its_centre() {
        let mut mask = GrayImage::new(40, 40);
        fill_rect(&mut mask, 10, 20, 11, 11);
        let contour = &find_contours(&mask)[0];
        assert_eq!(contour.moments().centroid(), Some(Point::new(15, 25)));
    }

    #[test]
    fn isolated_pixel_and_line_have_no_area() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(2, 2, Luma([255]));
        fill_rect(&mut mask, 5, 10, 8, 1);

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].points, vec![Point::new(2, 2)]);
        assert_eq!(contours[0].area(), 0.0);
        assert_eq!(contours[0].moments().centroid(), None);
        assert_eq!(contours[1].area(), 0.0);
        assert_eq!(contours[1].moments().centroid(), None);
    }

    #[test]
    fn diagonal_neighbours_belong_to_one_component() {
        let mut mask = GrayImage::new(10, 10);
        fill_rect(&mut mask, 1, 1, 3, 3);
        fill_rect(&mut mask, 4, 4, 3, 3);
        assert_eq!(find_contours(&mask).len(), 1);
    }

    #[test]
    fn l_shape_area_matches_polygon() {
        // A 2 pixel wide stem on rows 1..=6 with a 6 pixel wide foot on rows 5..=6.
        let mut mask = GrayImage::new(12, 12);
        fill_rect(&mut mask, 1, 1, 2, 6);
        fill_rect(&mut mask, 1, 5, 6, 2);

        let contour = &find_contours(&mask)[0];
        // The inner corner is cut diagonally from (2,4) to (3,5).
        assert_eq!(
            contour.points,
            vec![
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(2, 4),
                Point::new(3, 5),
                Point::new(6, 5),
                Point::new(6, 6),
                Point::new(1, 6),
            ]
        );
        assert_eq!(contour.area(), 9.5);
    }

    #[test]
    fn hole_does_not_change_outer_area() {
        let mut mask = GrayImage::new(20, 20);
        fill_rect(&mut mask, 2, 2, 12, 12);
        for y in 6..10 {
            for x in 6..10 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 121.0);
    }

    #[test]
    fn largest_prefers_biggest_then_earliest() {
        let mut mask = GrayImage::new(60, 30);
        fill_rect(&mut mask, 1, 1, 5, 5);
        fill_rect(&mut mask, 20, 1, 12, 12);
        fill_rect(&mut mask, 40, 1, 12, 12);

        let contours = find_contours(&mask);
        assert_eq!(contours.len(), 3);
        let best = largest(&contours).map(|c| c.points[0]);
        assert_eq!(best, Some(Point::new(20, 1)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn pixel_index_does_not_wrap_on_huge_frames() {
        assert_eq!(pixel_index(65_536, 1, 65_536), 4_294_967_297);
        let edge = u32::MAX as usize;
        assert_eq!(pixel_index(u32::MAX, u32::MAX, u32::MAX), edge * edge + edge);
        assert_eq!(pixel_index(640, 3, 2), 1283);
    }
}
