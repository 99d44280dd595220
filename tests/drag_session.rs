//! End-to-end editing: load, detect, drag on a zoomed thumbnail, rotate,
//! drag again, hand the result back.
//!
//! The displayed bitmap is a 10× downscale of a 3000×4000 photo tagged
//! EXIF 6, drawn at 2× zoom with an offset, so every commit goes through
//! the display inverse, the thumbnail scale and the orientation frame.

use zencrop::*;

const PHOTO: ImageInfo = ImageInfo::new(3000, 4000, 6);
const THUMBNAIL: Size = Size::new(300, 400);

fn display() -> Transform {
    Transform::scale(2.0, 2.0).then_translate(20.0, 30.0)
}

fn detected() -> Detection {
    Detection {
        corners: Corners::new(
            Point::new(100, 120),
            Point::new(3800, 90),
            Point::new(140, 2900),
            Point::new(3850, 2950),
        ),
        smart_crop: false,
    }
}

fn drag(view: &mut CropController, from: PointF, to: PointF) {
    assert!(view.pointer(PointerEvent::Down(from)), "no corner at {from:?}");
    assert!(view.pointer(PointerEvent::Move(to)));
    assert!(view.pointer(PointerEvent::Up(to)));
    assert!(!view.is_dragging());
}

fn loaded_view() -> (CropSession, LoadTicket, CropController) {
    let mut session = CropSession::new();
    let ticket = session.begin_load();
    assert_eq!(session.finish_load(ticket, &PHOTO), Ok(true));
    assert_eq!(
        session.apply_detection(ticket, Some(detected())),
        DetectionOutcome::Manual
    );

    let mut view = CropController::new(ControllerConfig::new().touch_radius(24.0));
    view.set_geometry(session.take());
    view.set_display_transform(display(), Some(THUMBNAIL));
    (session, ticket, view)
}

#[test]
fn initial_frame() {
    let (_, _, view) = loaded_view();
    let frame = view.frame().unwrap();
    assert_eq!(frame.bounds, RectF::new(20.0, 30.0, 820.0, 630.0));
    assert_eq!(frame.points[0], PointF::new(40.0, 54.0));
    assert_eq!(frame.active, None);
    assert!(!frame.invalid);
}

#[test]
fn edit_rotate_edit() {
    let (mut session, _, mut view) = loaded_view();

    // Top-right is drawn at (780, 48).
    drag(&mut view, PointF::new(778.0, 50.0), PointF::new(678.0, 150.0));
    let g = view.geometry().unwrap();
    assert_eq!(g.corners().unwrap()[CornerSlot::TopRight], Point::new(3300, 590));

    // Back to the native frame: the picture is now 3000×4000 upright.
    view.rotate_left();
    let g = view.geometry().unwrap();
    assert_eq!(g.orientation(), Orientation::Normal);
    assert_eq!(
        g.corners(),
        Some(&Corners::new(
            Point::new(590, 700),
            Point::new(2950, 150),
            Point::new(120, 3900),
            Point::new(2900, 3860),
        ))
    );
    assert_eq!(
        view.frame().unwrap().bounds,
        RectF::new(20.0, 30.0, 620.0, 830.0)
    );

    // Bottom-right is drawn at (600, 802).
    drag(&mut view, PointF::new(600.0, 800.0), PointF::new(610.0, 810.0));
    assert!(!view.is_invalid());

    let done = view.take_geometry().unwrap();
    assert_eq!(done.corners().unwrap()[CornerSlot::BottomRight], Point::new(2950, 3910));
    assert_eq!(session.replace(done), None);
    assert!(session.geometry().unwrap().has_corners());
}

#[test]
fn drag_frame_tracks_the_pointer() {
    let (_, _, mut view) = loaded_view();
    assert!(view.pointer(PointerEvent::Down(PointF::new(45.0, 610.0))));
    view.pointer(PointerEvent::Move(PointF::new(55.0, 600.0)));
    let frame = view.frame().unwrap();
    let active = frame.active.unwrap();
    assert_eq!(frame.points[active], PointF::new(58.0, 600.0));

    // Zooming mid-drag keeps the same corner under the finger.
    view.set_display_transform(Transform::scale(2.0, 2.0), Some(THUMBNAIL));
    let frame = view.frame().unwrap();
    assert_eq!(frame.points[frame.active.unwrap()], PointF::new(38.0, 570.0));

    assert!(view.pointer(PointerEvent::Cancel));
    let g = view.geometry().unwrap();
    assert_eq!(g.corners(), Some(&detected().corners));
}

#[test]
fn dragging_off_the_page_is_flagged_not_blocked() {
    let (_, _, mut view) = loaded_view();
    drag(&mut view, PointF::new(40.0, 54.0), PointF::new(0.0, 0.0));
    assert!(view.is_invalid());
    assert!(view.frame().unwrap().invalid);
    let g = view.geometry().unwrap();
    assert_eq!(g.corners().unwrap()[CornerSlot::TopLeft], Point::new(-100, -150));

    view.revert_selection();
    assert!(!view.is_invalid());
    assert_eq!(view.geometry().unwrap().corners(), Some(&detected().corners));
}

#[test]
fn corner_dragged_past_a_neighbour_survives_rotation() {
    let page = Size::new(1000, 2000);
    let mut view = CropController::new(ControllerConfig::new().touch_radius(24.0));
    view.set_geometry(Some(CropGeometry::with_corners(
        page,
        Orientation::Normal,
        Corners::full(page),
    )));
    drag(&mut view, PointF::new(0.0, 0.0), PointF::new(900.0, 900.0));

    // Top-right is now nearest the origin, so the labels move round.
    let edited = *view.geometry().unwrap().corners().unwrap();
    assert_eq!(
        edited,
        Corners::new(
            Point::new(1000, 0),
            Point::new(1000, 2000),
            Point::new(900, 900),
            Point::new(0, 2000),
        )
    );
    let outline = view.frame().unwrap().points;

    view.rotate_right();
    view.rotate_left();
    assert_eq!(view.geometry().unwrap().corners(), Some(&edited));
    assert_eq!(view.frame().unwrap().points, outline);
}

#[test]
fn slow_load_does_not_clobber_the_next_image() {
    let mut session = CropSession::new();
    let slow = session.begin_load();
    let fast = session.begin_load();
    session.finish_load(fast, &PHOTO).unwrap();
    session.apply_detection(fast, None);

    assert_eq!(session.finish_load(slow, &ImageInfo::new(640, 480, 1)), Ok(false));
    assert_eq!(
        session.apply_detection(slow, Some(detected())),
        DetectionOutcome::Stale
    );
    let g = session.geometry().unwrap();
    assert_eq!(g.native_size(), Size::new(3000, 4000));
    assert!(!g.has_corners());

    // Nothing found: fall back to the whole picture.
    let mut g = session.take().unwrap();
    g.set_corners(full_image_corners(&PHOTO).unwrap());
    assert_eq!(g.corners(), Some(&Corners::full(Size::new(4000, 3000))));
}
