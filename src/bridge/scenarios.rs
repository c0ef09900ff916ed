//! End-to-end scenarios: both domains, the register port and a bus master
//! stepped together.

use arbitrary_int::{u4, u11};

use crate::bridge::{
    builder::BridgeBuilder,
    helpers::STROBE_ALL,
    master::{BusMaster, Completion},
    regs::map::{self, WindowField},
    status::StatusBit,
    test_support::{Collaborator, Rig, test_bridge},
    types::Accumulators,
};

/// 1 ms at 1.6368 MHz.
const PERIOD_1MS: u32 = 1_636_800;

/// Runs up to `n` control ticks, each followed by `sampling` sampling ticks,
/// and returns the tick on which `done` first held.
fn control_until(
    rig: &mut Rig<'_>,
    n: u32,
    sampling: u32,
    mut done: impl FnMut(&Rig<'_>) -> bool,
) -> Option<u32> {
    for tick in 1..=n {
        rig.step(sampling);
        if done(rig) {
            return Some(tick);
        }
    }
    None
}

#[test]
fn timer_tic_reaches_status_and_clears() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::TIMER_PERIOD, PERIOD_1MS).unwrap();
    rig.write(map::CONTROL, 1).unwrap();
    rig.sample_ticks(u64::from(PERIOD_1MS) + 8);

    let c = &rig.collaborator;
    assert_eq!(c.tic_pulses, 1);
    let enabled_at = c.first_enabled_at.unwrap();
    let tic_at = c.first_tic_at.unwrap();
    assert_eq!(tic_at - enabled_at + 1, u64::from(PERIOD_1MS));

    // The shadow sees the event within D + 1 control ticks.
    assert_eq!(rig.control.shadow().tic_count(), 0);
    let seen = control_until(&mut rig, 3, 0, |r| r.control.shadow().tic_count() == 1);
    assert!(seen.is_some());

    assert_eq!(rig.read(map::TIC_COUNT).unwrap(), 1);
    assert_eq!(rig.read(map::STATUS).unwrap() & 0x1, 0x1);
    assert_eq!(rig.read(WindowField::MeasurementSequence.address(0)).unwrap(), 1);
    assert_eq!(
        rig.read(WindowField::MeasurementEpoch.address(0)).unwrap(),
        u32::from(tic_at as u16)
    );

    rig.write(map::STATUS, 0x1).unwrap();
    assert_eq!(rig.read(map::STATUS).unwrap() & 0x1, 0);
    assert_eq!(rig.read(map::TIC_COUNT).unwrap(), 1);
}

#[test]
fn byte_enables_merge_lanes_end_to_end() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::CH_CARR_INCR, 0x1122_3344).unwrap();
    rig.write_strobed(map::CH_CARR_INCR, 0xAABB_CCDD, u4::new(0b1010)).unwrap();
    assert_eq!(rig.read(map::CH_CARR_INCR).unwrap(), 0xAA22_CC44);

    rig.control_ticks(2);
    assert_eq!(rig.collaborator.last.carrier_increment, 0xAA22_CC44);
}

#[test]
fn unmapped_addresses_read_zero_and_ack_writes() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    assert_eq!(rig.read(0x0FFC).unwrap(), 0);
    assert_eq!(rig.read(0x0040).unwrap(), 0);
    assert_eq!(rig.read(WindowField::DumpSequence.address(1)).unwrap(), 0);

    rig.write(0x0FFC, 0xDEAD_BEEF).unwrap();
    assert_eq!(rig.read(0x0FFC).unwrap(), 0);
    assert_eq!(rig.read(map::ID).unwrap(), 0x4754_524B);
    assert_eq!(rig.read(map::VERSION).unwrap(), 0x0001_0000);
}

#[test]
fn prn_drives_enable_atomically() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::CH_PRN, 0).unwrap();
    rig.control_ticks(2);
    assert!(!rig.collaborator.last.enable);
    assert_eq!(rig.read(map::CH_ENABLE).unwrap(), 0);

    rig.write(map::CH_PRN, 5).unwrap();
    rig.control_ticks(2);
    assert!(rig.collaborator.last.enable);
    assert_eq!(rig.collaborator.last.prn, 5);
    assert_eq!(rig.read(map::CH_ENABLE).unwrap(), 1);

    rig.write(map::CH_PRN, 0).unwrap();
    rig.control_ticks(2);
    assert!(!rig.collaborator.last.enable);

    assert!(!rig.collaborator.torn_enable);
}

#[test]
fn each_slew_request_yields_one_pulse() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::CH_SLEW_AMOUNT, 0x7FF).unwrap();
    rig.write(map::CH_SLEW_REQUEST, 1).unwrap();
    rig.write(map::CH_SLEW_REQUEST, 1).unwrap();
    rig.control_ticks(2);

    assert_eq!(rig.collaborator.slew_pulses, 2);
    assert_eq!(rig.collaborator.last.slew_amount, u11::new(0x7FF));
    assert_eq!(rig.read(map::CH_SLEW_REQUEST).unwrap(), 0);

    // Bit 0 clear requests nothing.
    rig.write(map::CH_SLEW_REQUEST, 0).unwrap();
    rig.control_ticks(2);
    assert_eq!(rig.collaborator.slew_pulses, 2);
}

#[test]
fn clear_applies_one_tick_after_acceptance() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.collaborator.request_dump();
    rig.sample_ticks(1);
    rig.control_ticks(3);
    assert_eq!(rig.control.peek(map::STATUS), 0b10);

    rig.master.start_write(map::STATUS, 0b10, STROBE_ALL).unwrap();
    assert_eq!(rig.step(0), None);
    assert_eq!(rig.control.peek(map::STATUS), 0b10);
    assert_eq!(rig.step(0), Some(Completion::Written));
    assert_eq!(rig.control.peek(map::STATUS), 0);
}

#[test]
fn tic_arriving_with_a_clear_keeps_the_flag() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::TIMER_PERIOD, 64).unwrap();
    rig.write(map::CONTROL, 1).unwrap();
    let first = control_until(&mut rig, 100, 4, |r| {
        r.control.shadow().status().contains(StatusBit::TicSeen)
    });
    assert!(first.is_some());
    // Let the first event settle completely.
    rig.control_ticks(2);
    let before = rig.control.shadow().tic_count();

    // Publish the next tic while the control domain is stopped.
    let pulses = rig.collaborator.tic_pulses;
    while rig.collaborator.tic_pulses == pulses {
        rig.sample_ticks(1);
    }

    // Acceptance tick: the clear is queued and the new record is only in the
    // first synchronizer stage.
    rig.master.start_write(map::STATUS, 0x1, STROBE_ALL).unwrap();
    assert_eq!(rig.step(0), None);
    assert_eq!(rig.control.shadow().tic_count(), before);

    // The edge lands on the tick the clear is applied; the set wins.
    assert_eq!(rig.step(0), Some(Completion::Written));
    assert_eq!(rig.control.shadow().tic_count(), before + 1);
    assert_eq!(rig.control.peek(map::STATUS) & 0x1, 0x1);

    rig.write(map::STATUS, 0x1).unwrap();
    assert_eq!(rig.control.peek(map::STATUS) & 0x1, 0);
}

#[test]
fn dump_window_reads_sign_extended_accumulators() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.collaborator.inputs.dump_data.accumulators = Accumulators {
        early_i: -1,
        prompt_q: i16::MIN,
        late_q: 1234,
        ..Default::default()
    };
    rig.collaborator.request_dump();
    rig.sample_ticks(1);
    let dumped_at = rig.collaborator.ticks;
    rig.control_ticks(3);

    assert_eq!(rig.read(WindowField::DumpSequence.address(0)).unwrap(), 1);
    assert_eq!(rig.read(WindowField::EarlyI.address(0)).unwrap(), 0xFFFF_FFFF);
    assert_eq!(rig.read(WindowField::EarlyQ.address(0)).unwrap(), 0);
    assert_eq!(rig.read(WindowField::PromptQ.address(0)).unwrap(), 0xFFFF_8000);
    assert_eq!(rig.read(WindowField::LateQ.address(0)).unwrap(), 1234);
    assert_eq!(
        rig.read(WindowField::DumpEpoch.address(0)).unwrap(),
        u32::from(dumped_at as u16)
    );
    assert_eq!(rig.read(map::STATUS).unwrap(), 0b10);
    assert_eq!(rig.read(map::TIC_COUNT).unwrap(), 0);
}

#[test]
fn control_reset_restores_register_defaults() {
    let mut bridge = BridgeBuilder::new()
        .default_depth()
        .timer_defaults(1000, false)
        .build()
        .unwrap();
    let mut rig = Rig::new(&mut bridge, 4);
    assert_eq!(rig.read(map::TIMER_PERIOD).unwrap(), 1000);

    rig.write(map::TIMER_PERIOD, 40).unwrap();
    rig.write(map::CONTROL, 1).unwrap();
    rig.write(map::CH_PRN, 9).unwrap();
    rig.control_ticks(40);
    assert!(rig.read(map::TIC_COUNT).unwrap() > 0);
    assert!(rig.collaborator.last.enable);

    rig.control.reset();
    assert_eq!(rig.control.peek(map::TIC_COUNT), 0);
    assert_eq!(rig.control.peek(map::STATUS), 0);
    assert_eq!(rig.read(map::TIMER_PERIOD).unwrap(), 1000);
    assert_eq!(rig.read(map::CONTROL).unwrap(), 0);
    assert_eq!(rig.read(map::CH_PRN).unwrap(), 0);

    rig.control_ticks(2);
    assert!(!rig.collaborator.last.enable);
    assert!(!rig.sampling.timer_config().enabled);
}

#[test]
fn sampling_reset_resynchronizes_from_scratch() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::CH_PRN, 5).unwrap();
    rig.control_ticks(2);
    assert!(rig.collaborator.last.enable);

    rig.sampling.reset();
    let out = rig.collaborator.step(&mut rig.sampling);
    assert!(!out.enable);
    let out = rig.collaborator.step(&mut rig.sampling);
    assert!(out.enable);
    assert_eq!(out.prn, 5);
}

#[test]
fn sampling_reset_mid_run_is_not_an_event() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 4);

    rig.write(map::TIMER_PERIOD, 40).unwrap();
    rig.write(map::CONTROL, 1).unwrap();

    for round in 0..4 {
        // Alternate the marker level left behind when the reset hits.
        let marker = round % 2 == 0;
        let settled = control_until(&mut rig, 200, 4, |r| {
            let latest = r.sampling.measurement_record();
            latest.sequence >= 2
                && latest.toggle == marker
                && r.control.shadow().measurement().sequence == latest.sequence
        });
        assert!(settled.is_some(), "round {round} never settled");

        rig.write(map::STATUS, 0b11).unwrap();
        let counted = rig.control.shadow().tic_count();
        assert_eq!(counted, rig.collaborator.tic_pulses);

        rig.sampling.reset();
        rig.control_ticks(4);
        assert_eq!(rig.control.shadow().tic_count(), counted);
        assert_eq!(rig.control.peek(map::STATUS), 0);

        let next = control_until(&mut rig, 30, 4, |r| r.control.shadow().tic_count() > counted);
        assert!(next.is_some());
        assert_eq!(rig.control.shadow().measurement().sequence, 1);
    }

    let shadow = rig.control.shadow();
    assert_eq!(shadow.tic_count(), rig.collaborator.tic_pulses);
    assert_eq!(shadow.coalesced_tics(), 0);
    assert_eq!(shadow.coalesced_dumps(), 0);
}

#[test]
fn slow_control_accounts_for_every_coalesced_tic() {
    let mut bridge = test_bridge();
    let mut rig = Rig::new(&mut bridge, 200);

    rig.write(map::TIMER_PERIOD, 70).unwrap();
    rig.write(map::CONTROL, 1).unwrap();
    rig.control_ticks(50);

    let shadow = rig.control.shadow();
    assert!(shadow.tic_count() > 0);
    assert!(shadow.tic_count() < rig.collaborator.tic_pulses);
    assert!(shadow.coalesced_tics() > 0);
    assert_eq!(
        shadow.tic_count() + shadow.coalesced_tics(),
        shadow.measurement().sequence
    );
}

#[test]
fn domains_run_on_separate_threads() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let mut bridge = test_bridge();
    let (mut control, mut sampling) = bridge.split();
    let stop = AtomicBool::new(false);

    let collaborator = std::thread::scope(|s| {
        let worker = s.spawn(|| {
            let mut collaborator = Collaborator::default();
            while !stop.load(Ordering::Relaxed) {
                collaborator.step(&mut sampling);
            }
            collaborator
        });

        let mut master = BusMaster::new();
        let mut transact = |master: &mut BusMaster| master.run(1000, |inputs| control.tick(inputs));

        for (addr, data) in [(map::CH_PRN, 7), (map::TIMER_PERIOD, 100), (map::CONTROL, 1)] {
            master.start_write(addr, data, STROBE_ALL).unwrap();
            assert_eq!(transact(&mut master).unwrap(), Completion::Written);
        }

        let mut tics = 0;
        for _ in 0..1_000_000 {
            master.start_read(map::TIC_COUNT).unwrap();
            if let Completion::Read(n) = transact(&mut master).unwrap() {
                tics = n;
            }
            if tics >= 3 {
                break;
            }
            std::thread::yield_now();
        }
        stop.store(true, Ordering::Relaxed);
        assert!(tics >= 3);

        worker.join().unwrap()
    });

    assert!(!collaborator.torn_enable);
    assert!(collaborator.last.enable);
    assert_eq!(collaborator.last.prn, 7);

    let shadow = control.shadow();
    assert!(collaborator.tic_pulses >= shadow.tic_count());
    assert_eq!(
        shadow.tic_count() + shadow.coalesced_tics(),
        shadow.measurement().sequence
    );
}
