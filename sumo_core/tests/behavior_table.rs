use rstest::rstest;
use sumo_core::mocks::ScriptedRandom;
use sumo_core::{
    Behavior, BehaviorController, ContactDetector, DetectorCfg, Direction, MotionReading,
    MotorCommand, ProximityDebouncer, SpeedCfg, TimingCfg,
};
use sumo_traits::{BoundaryFlags, Proximity};

const NOW: u64 = 5_000;

fn controller() -> BehaviorController {
    let detector = ContactDetector::new(DetectorCfg::default()).unwrap();
    let mut c = BehaviorController::new(
        SpeedCfg {
            search: 150,
            sustained: 300,
            full: 400,
            ..SpeedCfg::default()
        },
        TimingCfg::default(),
        detector,
        ProximityDebouncer::new(3),
    );
    c.reset(0);
    c
}

fn hit_reading(x: i32) -> MotionReading {
    MotionReading {
        filtered_x: x,
        filtered_y: 0,
        magnitude_sq: 3000 * 3000,
        ..MotionReading::default()
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    None,
    Left,
    Right,
    Both,
}

impl Edge {
    fn flags(self) -> BoundaryFlags {
        match self {
            Edge::None => BoundaryFlags::default(),
            Edge::Left => BoundaryFlags {
                left: true,
                right: false,
            },
            Edge::Right => BoundaryFlags {
                left: false,
                right: true,
            },
            Edge::Both => BoundaryFlags {
                left: true,
                right: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Sight {
    Nothing,
    Close,
    VeryClose,
}

impl Sight {
    fn readings(self) -> [Proximity; 3] {
        let p = match self {
            Sight::Nothing => Proximity::default(),
            Sight::Close => Proximity {
                close: true,
                very_close: false,
            },
            Sight::VeryClose => Proximity {
                close: true,
                very_close: true,
            },
        };
        [p; 3]
    }
}

#[rstest]
fn exactly_one_branch_in_priority_order(
    #[values(Edge::None, Edge::Left, Edge::Right, Edge::Both)] edge: Edge,
    #[values(Sight::Nothing, Sight::Close, Sight::VeryClose)] sight: Sight,
    #[values(false, true)] contact: bool,
) {
    let mut c = controller();
    let reading = if contact {
        hit_reading(1000)
    } else {
        MotionReading::default()
    };
    let d = c.decide(
        NOW,
        &reading,
        edge.flags(),
        &sight.readings(),
        &mut ScriptedRandom::new(vec![0]),
    );

    let expected = match (edge, sight, contact) {
        (Edge::Left | Edge::Right | Edge::Both, _, _) => Behavior::Turn,
        (Edge::None, Sight::VeryClose, _) => Behavior::Charge,
        (Edge::None, Sight::Close, _) => Behavior::Approach,
        (Edge::None, Sight::Nothing, true) => Behavior::Evade,
        (Edge::None, Sight::Nothing, false) => Behavior::Search,
    };
    assert_eq!(d.maneuver.behavior, expected);
    assert_eq!(c.last_behavior(), expected);
    assert_eq!(d.contact_made, contact || matches!((edge, sight), (Edge::None, Sight::VeryClose)));
}

#[rstest]
#[case(Edge::Left, Direction::Right)]
#[case(Edge::Right, Direction::Left)]
#[case(Edge::Both, Direction::Right)]
fn boundary_turns_away_from_edge(#[case] edge: Edge, #[case] pivot: Direction) {
    let mut c = controller();
    let d = c.decide(
        NOW,
        &MotionReading::default(),
        edge.flags(),
        &[],
        &mut ScriptedRandom::new(vec![0]),
    );
    assert_eq!(d.maneuver.segments[0].command, MotorCommand::reverse(200));
    assert_eq!(d.maneuver.segments[0].hold_ms, 200);
    assert_eq!(d.maneuver.segments[1].command, MotorCommand::pivot(pivot, 200));
}

#[rstest]
#[case(1200, Direction::Left)]
#[case(0, Direction::Left)]
#[case(-1200, Direction::Right)]
fn evade_pivots_against_push(#[case] x: i32, #[case] pivot: Direction) {
    let mut c = controller();
    let d = c.decide(
        NOW,
        &hit_reading(x),
        BoundaryFlags::default(),
        &[],
        &mut ScriptedRandom::new(vec![]),
    );
    assert_eq!(d.maneuver.behavior, Behavior::Evade);
    assert_eq!(
        d.maneuver.segments[0],
        sumo_core::Segment {
            command: MotorCommand::pivot(pivot, 400),
            hold_ms: 450,
        }
    );
    // resumes at the tier the hit escalated to, then drops contact
    assert_eq!(d.maneuver.final_command(), MotorCommand::forward(400));
    assert!(!c.contact_state().in_contact);
    assert_eq!(c.contact_state().last_turn_at_ms, NOW + 450);
}

#[rstest]
#[case(-2, 150)]
#[case(0, 300)]
#[case(5, 675)]
#[case(9, 675)] // clamped to jitter_max
fn search_turn_jitter(#[case] steps: i32, #[case] pivot_ms: u64) {
    let mut c = controller();
    let d = c.decide(
        NOW,
        &MotionReading::default(),
        Edge::Right.flags(),
        &[],
        &mut ScriptedRandom::new(vec![steps]),
    );
    assert_eq!(d.maneuver.segments[1].hold_ms, pivot_ms);
}

#[test]
fn engaged_turn_uses_base_duration() {
    let mut c = controller();
    let close = Sight::Close.readings();
    let d = c.decide(
        NOW,
        &MotionReading::default(),
        BoundaryFlags::default(),
        &close,
        &mut ScriptedRandom::new(vec![]),
    );
    assert_eq!(d.maneuver.behavior, Behavior::Approach);

    let d = c.decide(
        NOW + 10,
        &MotionReading::default(),
        Edge::Left.flags(),
        &close,
        &mut ScriptedRandom::new(vec![5]),
    );
    assert_eq!(d.maneuver.behavior, Behavior::Turn);
    assert_eq!(d.maneuver.segments[1].hold_ms, 300);
}

#[test]
fn single_noisy_sighting_never_engages() {
    let mut c = controller();
    let blip = [
        Proximity {
            close: true,
            very_close: true,
        },
        Proximity::default(),
        Proximity {
            close: true,
            very_close: true,
        },
    ];
    let d = c.decide(
        NOW,
        &MotionReading::default(),
        BoundaryFlags::default(),
        &blip,
        &mut ScriptedRandom::new(vec![]),
    );
    assert_eq!(d.maneuver.behavior, Behavior::Search);
}

#[test]
fn confirmation_streak_spans_ticks() {
    let mut c = controller();
    let vc = Proximity {
        close: true,
        very_close: true,
    };
    let mut rng = ScriptedRandom::new(vec![]);
    let d1 = c.decide(NOW, &MotionReading::default(), BoundaryFlags::default(), &[vc, vc], &mut rng);
    assert_eq!(d1.maneuver.behavior, Behavior::Search);
    let d2 = c.decide(NOW + 10, &MotionReading::default(), BoundaryFlags::default(), &[vc], &mut rng);
    assert_eq!(d2.maneuver.behavior, Behavior::Charge);
}
