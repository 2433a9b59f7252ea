use proptest::prelude::*;
use ruidakit_communication::Session;

proptest! {
    #[test]
    fn frame_follows_width_or_height_rule(
        sizes in prop::collection::vec((1u32..500, 1u32..500), 1..20)
    ) {
        let mut session = Session::new("job");
        let mut expected = 0usize;
        let mut frame = (0u32, 0u32);
        for (index, &(w, h)) in sizes.iter().enumerate() {
            session.start_part(0.0, 0.0, f64::from(w), f64::from(h)).unwrap();
            if index == 0 || w > frame.0 || h > frame.1 {
                expected = index;
                frame = (w, h);
            }
        }
        prop_assert_eq!(session.frame_index(), Some(expected));
    }

    #[test]
    fn motion_inside_bed_never_fails(
        points in prop::collection::vec((0.0f64..900.0, 0.0f64..600.0, any::<bool>()), 1..50)
    ) {
        let mut session = Session::new("job");
        session.start_part(0.0, 0.0, 900.0, 600.0).unwrap();
        for (x, y, is_move) in points {
            if is_move {
                prop_assert!(session.move_to(x, y).is_ok());
            } else {
                prop_assert!(session.line_to(x, y).is_ok());
            }
        }
    }
}
