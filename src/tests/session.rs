use super::*;
use crate::{config::SessionConfig, render::Color};

const SESSION: &str = "
name: session
outdir: tmp/test-output
map:
  center: {lat: 51.505, lng: -0.09}
  zoom: 13
draw:
  rectangle: true
events:
  - created:
      points: [[51.50, -0.10], [51.51, -0.10], [51.51, -0.09], [51.50, -0.09]]
  - created:
      shape: rectangle
      points: [[51.505, -0.095], [51.515, -0.095], [51.515, -0.085], [51.505, -0.085]]
  - created:
      shape: marker
      points: [[51.52, -0.08]]
  - deleted:
      layers:
        - id: 1
";

#[test]
fn replay_session() -> Result<()> {
    init_test_logger();

    let config: SessionConfig = serde_norway::from_str(SESSION)?;
    let mut w = MapWidget::new(config.widget)?;

    let mut outcomes = vec![];
    for (i, event) in config.events.into_iter().enumerate() {
        let outcome = w.handle(event)?;
        outcomes.push(outcome.to_string());

        if i == 1 {
            let colors: Vec<_> = w.render_list().iter().map(|item| item.color).collect();
            assert_eq!(colors, vec![Color::Red, Color::Red]);
            save("session-conflict", &w)?;
        }
    }

    assert_eq!(outcomes, vec![
        "added #0",
        "added #1, conflicts with #0",
        "marker tool is disabled",
        "removed 1, unmatched 0",
    ]);
    assert_eq!(w.store().len(), 1);
    assert!(!w.store().has_conflicts());

    save("session-final", &w)?;

    Ok(())
}
