use chrono::NaiveTime;
use skycam::colour::temperature_to_colour;
use skycam::exposure::{
    BrightnessSample, CycleInput, DaylightWindow, ExposureMode, ExposureModeController,
    ExposureSettings, ExposureState, ModeChange, ShutterAdjustment, SkyLabel,
};
use skycam::geo::{SolarEvent, SolarEventKind, SolarTimes};

const SUNRISE: i64 = 6 * 3600;
const SUNSET: i64 = 18 * 3600;

fn solar_times(sunrise: i64, sunset: i64) -> SolarTimes {
    SolarTimes {
        sunrise: SolarEvent {
            kind: SolarEventKind::Sunrise,
            seconds: sunrise,
        },
        sunset: SolarEvent {
            kind: SolarEventKind::Sunset,
            seconds: sunset,
        },
        solar_noon: (sunrise + sunset) / 2,
    }
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn cycle_input(time_of_day: NaiveTime, sample: Option<BrightnessSample>) -> CycleInput {
    CycleInput {
        time_of_day,
        solar_times: Ok(solar_times(SUNRISE, SUNSET)),
        utc_offset_hours: 0,
        sample,
        sky_label: None,
    }
}

fn state(settings: &ExposureSettings, mode: ExposureMode, shutter: i64, gain: i64) -> ExposureState {
    let limits = settings.limits_for(mode);
    ExposureState {
        mode,
        shutter: limits.shutter(shutter),
        gain: limits.gain(gain),
        clear_sky_streak: 0,
    }
}

#[test]
fn test_day_at_minimum_gain_switches_to_high_gain_before_sunset() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let day = state(&settings, ExposureMode::Day, 4_000, settings.day_limits.gain_min);

    let (next, report) = controller.evaluate(day, &cycle_input(at(17, 30), None));

    assert_eq!(
        report.transition,
        Some(ModeChange {
            from: ExposureMode::Day,
            to: ExposureMode::DayHighGain
        })
    );
    assert!(!report.parameters_reset);
    assert_eq!(next.shutter.value(), 4_000);
    assert_eq!(next.gain.value(), settings.gain_high);
}

#[test]
fn test_day_above_minimum_gain_stays_in_day() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let day = state(&settings, ExposureMode::Day, 4_000, 400);

    let (next, report) = controller.evaluate(day, &cycle_input(at(17, 30), None));
    assert_eq!(report.transition, None);
    assert_eq!(next.mode, ExposureMode::Day);
}

#[test]
fn test_night_dark_frame_resets_shutter_from_any_value() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let dark = BrightnessSample::new(5.0, 0.0);

    for shutter in [settings.night_limits.shutter_min, 123_456, settings.night_limits.shutter_max] {
        let mut night = state(&settings, ExposureMode::Night, shutter, settings.gain_night);
        let (adjustment, long_wait) = controller.adapt_exposure(&mut night, &dark);

        assert_eq!(
            adjustment,
            Some(ShutterAdjustment::ResetToNightDefault(settings.shutter_night))
        );
        assert!(!long_wait);
        assert_eq!(night.shutter.value(), settings.shutter_night);
    }
}

#[test]
fn test_full_day_walkthrough() {
    let controller = ExposureModeController::default();
    let mut current = controller.initial_state();
    let mut modes = Vec::new();

    for (time, sample) in [
        (at(2, 0), None),
        (at(3, 0), Some(BrightnessSample::new(90.0, 0.0))),
        (at(7, 0), Some(BrightnessSample::new(3.0, 0.0))),
        (at(12, 0), Some(BrightnessSample::new(250.0, 0.1))),
        (at(17, 20), Some(BrightnessSample::new(120.0, 0.0))),
        (at(19, 0), Some(BrightnessSample::new(120.0, 0.0))),
    ] {
        let (next, report) = controller.evaluate(current, &cycle_input(time, sample));
        if let Some(change) = report.transition {
            modes.push(change.to);
        }
        current = next;
    }

    assert_eq!(
        modes,
        vec![
            ExposureMode::Night,
            ExposureMode::Day,
            ExposureMode::DayHighGain,
            ExposureMode::Night
        ]
    );
    assert_eq!(current.shutter.value(), controller.settings().shutter_night);
}

#[test]
fn test_glare_requests_long_wait() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let day = state(&settings, ExposureMode::Day, 2_000, settings.day_limits.gain_min);

    let glare = BrightnessSample::new(250.0, 0.0);
    let (next, report) = controller.evaluate(day, &cycle_input(at(10, 0), Some(glare)));

    assert!(report.long_wait);
    assert_eq!(
        report.adjustment,
        Some(ShutterAdjustment::DrivenToMinimum(settings.day_limits.shutter_min))
    );
    assert!(next.shutter.is_at_min());
}

#[test]
fn test_clear_sky_notification_refires_after_cloud() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let threshold = settings.clear_sky_streak as usize;
    let frame = BrightnessSample::new(40.0, 0.0);
    let mut night = state(&settings, ExposureMode::Night, settings.shutter_night, settings.gain_night);

    let mut fired_at = Vec::new();
    let labels = std::iter::repeat_n(SkyLabel::Clear, threshold + 5)
        .chain([SkyLabel::Cloudy, SkyLabel::Indeterminate])
        .chain(std::iter::repeat_n(SkyLabel::Clear, threshold));

    for (i, label) in labels.enumerate() {
        if controller.record_sky(&mut night, Some(label), &frame) {
            fired_at.push(i);
        }
    }

    // Indeterminate falls back to the bright fraction, which is clear here
    let second_run_start = threshold + 5 + 1;
    assert_eq!(fired_at, vec![threshold - 1, second_run_start + threshold - 1]);
}

#[test]
fn test_mode_change_resets_streak() {
    let settings = ExposureSettings::default();
    let controller = ExposureModeController::new(settings);
    let frame = BrightnessSample::new(40.0, 0.0);
    let mut night = state(&settings, ExposureMode::Night, settings.shutter_night, settings.gain_night);

    for _ in 0..5 {
        controller.record_sky(&mut night, Some(SkyLabel::Clear), &frame);
    }
    assert_eq!(night.clear_sky_streak, 5);

    let (day, report) = controller.evaluate(night, &cycle_input(at(9, 0), None));
    assert_eq!(report.transition.map(|c| c.to), Some(ExposureMode::Day));
    assert_eq!(day.clear_sky_streak, 0);
}

#[test]
fn test_evaluation_is_deterministic() {
    let controller = ExposureModeController::default();
    let sample = Some(BrightnessSample::new(150.0, 0.01));

    for time in [at(0, 30), at(6, 0), at(6, 1), at(17, 1), at(18, 0), at(23, 59)] {
        for mode in [
            ExposureMode::Unknown,
            ExposureMode::Day,
            ExposureMode::Night,
            ExposureMode::DayHighGain,
        ] {
            let mut start = controller.initial_state();
            start.mode = mode;
            let input = cycle_input(time, sample);

            let first = controller.evaluate(start, &input);
            let second = controller.evaluate(start, &input);
            assert_eq!(first, second, "{mode} at {time}");
        }
    }
}

#[test]
fn test_utc_offset_moves_the_window() {
    let window = DaylightWindow::new(&solar_times(SUNRISE, SUNSET), -3);
    assert_eq!(window.sunrise, 3 * 3600);
    assert_eq!(window.sunset, 15 * 3600);
    assert!(window.is_night(16 * 3600));
}

#[test]
fn test_temperature_5000_matches_channel_formulas() {
    let colour = temperature_to_colour(5000).unwrap();
    let t = 5000.0f64 - 60.0;

    let red = 329.698727446 * t.powf(-0.1332047592);
    let green = 288.1221695283 * t.powf(-0.0755148492);

    assert!((f64::from(colour.rgb.red) - red).abs() <= 1.0);
    assert!((f64::from(colour.rgb.green) - green).abs() <= 1.0);
    assert_eq!(colour.rgb.blue, 255);
    assert_eq!(colour.luminosity, 1.0);
}
