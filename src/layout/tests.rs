use super::*;

fn inputs(clear_button: AnchorGravity, resource_bar: AnchorGravity) -> LayoutInputs {
    LayoutInputs {
        clear_button,
        resource_bar,
        orientation: Orientation::Portrait,
        handedness: Handedness::Right,
        clear_button_visible: true,
        resource_bar_visible: true,
        phone_ui: true,
        density: 1.0,
        metrics: LayoutMetrics::new(77, 50),
    }
}

fn margins(placement: OverlayPlacement) -> Margins {
    placement.margins.expect("positional anchor has margins")
}

#[test]
fn top_corner_button_uses_top_margin_only() {
    let out = compute_layout(&inputs(AnchorGravity::TopRight, AnchorGravity::Suppressed));
    assert_eq!(
        margins(out.clear_button),
        Margins {
            left: 0,
            top: 77,
            right: 0,
            bottom: 0
        }
    );
    assert!(out.clear_button.visible);
}

#[test]
fn bottom_corner_button_uses_bottom_margin_in_portrait() {
    let out = compute_layout(&inputs(AnchorGravity::BottomLeft, AnchorGravity::Suppressed));
    assert_eq!(
        margins(out.clear_button),
        Margins {
            left: 0,
            top: 0,
            right: 0,
            bottom: 50
        }
    );
}

#[test]
fn landscape_phone_reference_corner_gets_side_allowance() {
    let mut layout = inputs(AnchorGravity::TopRight, AnchorGravity::Suppressed);
    layout.orientation = Orientation::Landscape;
    let out = compute_layout(&layout);
    assert_eq!(margins(out.clear_button).right, 50);
    assert_eq!(margins(out.clear_button).left, 0);
}

#[test]
fn left_handed_allowance_moves_to_left_corner() {
    let mut layout = inputs(AnchorGravity::TopLeft, AnchorGravity::Suppressed);
    layout.orientation = Orientation::Landscape;
    layout.handedness = Handedness::Left;
    let out = compute_layout(&layout);
    assert_eq!(margins(out.clear_button).left, 50);
    assert_eq!(margins(out.clear_button).right, 0);

    layout.clear_button = AnchorGravity::TopRight;
    let out = compute_layout(&layout);
    assert_eq!(margins(out.clear_button).left, 0);
    assert_eq!(margins(out.clear_button).right, 0);
}

#[test]
fn landscape_phone_drops_bottom_margin_and_adds_side_allowance() {
    let mut layout = inputs(AnchorGravity::BottomRight, AnchorGravity::Suppressed);
    layout.orientation = Orientation::Landscape;
    let out = compute_layout(&layout);
    assert_eq!(
        margins(out.clear_button),
        Margins {
            left: 0,
            top: 0,
            right: 50,
            bottom: 0
        }
    );
}

#[test]
fn tablet_landscape_keeps_bottom_margin_without_allowance() {
    let mut layout = inputs(AnchorGravity::BottomRight, AnchorGravity::Suppressed);
    layout.orientation = Orientation::Landscape;
    layout.phone_ui = false;
    let out = compute_layout(&layout);
    assert_eq!(
        margins(out.clear_button),
        Margins {
            left: 0,
            top: 0,
            right: 0,
            bottom: 50
        }
    );
}

#[test]
fn suppressed_and_merged_anchors_skip_layout() {
    for anchor in [AnchorGravity::Suppressed, AnchorGravity::Merged] {
        let out = compute_layout(&inputs(anchor, anchor));
        assert!(!out.clear_button.visible);
        assert!(out.clear_button.margins.is_none());
        assert!(!out.resource_bar.visible);
        assert!(out.resource_bar.margins.is_none());
    }
}

#[test]
fn bar_sits_flush_against_top_left_button() {
    let out = compute_layout(&inputs(AnchorGravity::TopLeft, AnchorGravity::Top));
    assert_eq!(
        margins(out.resource_bar),
        Margins {
            left: 50,
            top: 15 + 77,
            right: 10,
            bottom: 0
        }
    );
}

#[test]
fn bar_on_opposite_edge_keeps_default_margins() {
    let out = compute_layout(&inputs(AnchorGravity::TopRight, AnchorGravity::Bottom));
    assert_eq!(
        margins(out.resource_bar),
        Margins {
            left: 10,
            top: 0,
            right: 10,
            bottom: 15 + 50
        }
    );
}

#[test]
fn hidden_button_does_not_push_the_bar() {
    let mut layout = inputs(AnchorGravity::BottomRight, AnchorGravity::Bottom);
    layout.clear_button_visible = false;
    let out = compute_layout(&layout);
    assert_eq!(margins(out.resource_bar).right, 10);
}

#[test]
fn merged_button_does_not_push_the_bar() {
    let out = compute_layout(&inputs(AnchorGravity::Merged, AnchorGravity::Bottom));
    assert_eq!(margins(out.resource_bar).left, 10);
    assert_eq!(margins(out.resource_bar).right, 10);
}

#[test]
fn bar_opposite_side_keeps_allowance_in_landscape() {
    let mut layout = inputs(AnchorGravity::BottomLeft, AnchorGravity::Bottom);
    layout.orientation = Orientation::Landscape;
    let out = compute_layout(&layout);
    assert_eq!(
        margins(out.resource_bar),
        Margins {
            left: 50,
            top: 0,
            right: 10 + 50,
            bottom: 15
        }
    );
}

#[test]
fn margins_scale_with_density() {
    let mut layout = inputs(AnchorGravity::TopRight, AnchorGravity::Top);
    layout.density = 2.0;
    let out = compute_layout(&layout);
    assert_eq!(margins(out.clear_button).top, 154);
    assert_eq!(
        margins(out.resource_bar),
        Margins {
            left: 20,
            top: 30 + 154,
            right: 100,
            bottom: 0
        }
    );
}

#[test]
fn dp_to_px_truncates_and_rejects_bad_density() {
    assert_eq!(dp_to_px(10, 1.5), 15);
    assert_eq!(dp_to_px(3, 1.5), 4);
    assert_eq!(dp_to_px(10, f32::NAN), 0);
    assert_eq!(dp_to_px(10, -1.0), 0);
}

#[test]
fn sibling_avoidance_holds_across_every_combination() {
    for button in AnchorGravity::POSITIONS {
        for bar in AnchorGravity::POSITIONS {
            for orientation in [Orientation::Portrait, Orientation::Landscape] {
                for handedness in [Handedness::Right, Handedness::Left] {
                    for button_visible in [true, false] {
                        for bar_visible in [true, false] {
                            let mut layout = inputs(button, bar);
                            layout.orientation = orientation;
                            layout.handedness = handedness;
                            layout.clear_button_visible = button_visible;
                            layout.resource_bar_visible = bar_visible;
                            let out = compute_layout(&layout);
                            assert_eq!(out.clear_button.visible, button_visible);
                            assert_eq!(out.resource_bar.visible, bar_visible);
                            let bar_margins = margins(out.resource_bar);
                            margins(out.clear_button);

                            if button_visible && bar_visible && button.on_top() == bar.on_top() {
                                let side = if button.on_left() {
                                    bar_margins.left
                                } else {
                                    bar_margins.right
                                };
                                assert_eq!(
                                    side, ELEMENT_SIZE_DP,
                                    "{button:?}/{bar:?} {orientation:?} {handedness:?}"
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn layout_is_a_pure_function_of_inputs() {
    let layout = inputs(AnchorGravity::BottomRight, AnchorGravity::Bottom);
    assert_eq!(compute_layout(&layout), compute_layout(&layout));
}
