use svg::{node::element, Document};

use crate::{config::MapConfig, io::projection::WebMercator, render::RenderItem};

pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ViewBox {
    /// Starts around the map center, which projects to the origin.
    pub fn new() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        }
    }

    pub fn include(&mut self, (x, y): (f64, f64)) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn add_margin(&mut self, margin: f64) {
        self.min_x -= margin;
        self.min_y -= margin;
        self.max_x += margin;
        self.max_y += margin;
    }

    pub fn get(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x - self.min_x, self.max_y - self.min_y)
    }
}

fn make_svg_path(item: &RenderItem, proj: &WebMercator, view_box: &mut ViewBox) -> Option<element::Path> {
    let mut points = item.outline.iter().map(|&p| proj.project(p));
    let p0 = points.next()?;

    let mut data = element::path::Data::new().move_to(p0);
    view_box.include(p0);

    for p in points {
        data = data.line_to(p);
        view_box.include(p);
    }

    data = data.close();

    let path = element::Path::new()
        .set("id", format!("polygon-{}", item.id.0))
        .set("d", data)
        .set("fill", item.color.fill())
        .set("stroke", item.color.stroke())
        .set("vector-effect", "non-scaling-stroke");

    Some(path)
}

fn make_center_marker() -> element::Circle {
    element::Circle::new()
        .set("cx", 0)
        .set("cy", 0)
        .set("r", 3)
        .set("fill", "#329544FF")
        .set("stroke", "none")
}

pub fn make_svg(items: &[RenderItem], map: &MapConfig) -> Document {
    let proj = WebMercator::new(map);
    let mut view_box = ViewBox::new();

    let mut g_polygons = element::Group::new()
        .set("stroke-width", 2);

    for item in items {
        if let Some(path) = make_svg_path(item, &proj, &mut view_box) {
            g_polygons = g_polygons.add(path);
        }
    }

    view_box.add_margin(20.0);

    Document::new()
        .set("viewBox", view_box.get())
        .add(g_polygons)
        .add(make_center_marker())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coords::normalize, render::render_list, store::PolygonStore};

    #[test]
    fn document_has_one_path_per_polygon() {
        let mut store = PolygonStore::new();
        store.insert(normalize(vec![(51.5, -0.1), (51.51, -0.1), (51.51, -0.09)]));
        let flagged = store.insert(normalize(vec![(51.49, -0.08), (51.5, -0.08), (51.5, -0.07)]));
        store.insert(vec![]);
        store.flag(flagged);

        let doc = make_svg(&render_list(&store), &MapConfig::default()).to_string();

        assert_eq!(doc.matches("<path").count(), 2);
        assert!(doc.contains("id=\"polygon-1\""));
        assert!(doc.contains("stroke=\"red\""));
        assert!(doc.contains("stroke=\"blue\""));
        assert!(doc.contains("<circle"));
    }
}
