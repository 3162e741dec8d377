use super::*;

fn rect(id: &str) -> Layer {
    Layer::with_id(
        id,
        LayerKind::Overlay(OverlayLayer::new(
            OverlayShape::Rectangle,
            Size::new(10.0, 10.0),
            Color::RED,
        )),
    )
}

fn ids(ws: &Workspace) -> Vec<&str> {
    ws.layers().iter().map(|l| l.id().as_str()).collect()
}

#[test]
fn add_rejects_duplicate_ids() {
    let mut ws = Workspace::new();
    ws.add_layer(rect("a")).unwrap();
    let err = ws.add_layer(rect("a")).unwrap_err();
    assert!(matches!(err, ThumbError::InvalidSpec(_)));
    assert_eq!(ws.layers().len(), 1);
}

#[test]
fn move_up_and_down_swap_neighbours() {
    let mut ws = Workspace::new();
    for id in ["a", "b", "c"] {
        ws.add_layer(rect(id)).unwrap();
    }
    let order = ws.move_up(&"a".into()).unwrap();
    assert_eq!(order, vec![LayerId::new("b"), "a".into(), "c".into()]);

    ws.move_up(&"c".into()).unwrap();
    assert_eq!(ids(&ws), ["b", "a", "c"]);

    ws.move_down(&"c".into()).unwrap();
    assert_eq!(ids(&ws), ["b", "c", "a"]);

    ws.move_down(&"b".into()).unwrap();
    assert_eq!(ids(&ws), ["b", "c", "a"]);

    assert!(ws.move_up(&"zzz".into()).is_err());
}

#[test]
fn insert_remove_and_duplicate() {
    let mut ws = Workspace::new();
    ws.add_layer(rect("a")).unwrap();
    ws.add_layer(rect("c")).unwrap();
    ws.insert_layer(1, rect("b")).unwrap();
    assert_eq!(ids(&ws), ["a", "b", "c"]);
    assert!(ws.insert_layer(9, rect("x")).is_err());

    let removed = ws.remove_layer(&"b".into()).unwrap();
    assert_eq!(removed.id().as_str(), "b");
    assert!(ws.remove_layer(&"b".into()).is_err());

    ws.layer_mut(&"a".into()).unwrap().label = "Box".to_owned();
    let copy = ws.duplicate_layer(&"a".into()).unwrap();
    assert_eq!(ws.index_of(&copy), Some(1));
    assert_ne!(copy.as_str(), "a");
    let dup = ws.layer(&copy).unwrap();
    assert_eq!(dup.label, "Box copy");
    assert_eq!(dup.kind, ws.layer(&"a".into()).unwrap().kind);
    ws.validate().unwrap();

    ws.clear_layers();
    assert!(ws.layers().is_empty());
}

#[test]
fn starter_is_valid_and_stacks_banner_below_text() {
    let ws = Workspace::starter();
    ws.validate().unwrap();
    let kinds: Vec<_> = ws.layers().iter().map(|l| l.kind.type_name()).collect();
    assert_eq!(kinds, ["overlay", "text", "text"]);
    let labels: Vec<_> = ws.layers().iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, ["Banner", "Headline", "Subheadline"]);
}

#[test]
fn validate_reports_bad_background() {
    let mut ws = Workspace::new();
    ws.set_background(crate::scene::model::BackgroundSpec::Gradient {
        stops: vec![],
        direction: Default::default(),
    });
    assert!(matches!(ws.validate(), Err(ThumbError::InvalidSpec(_))));
}
