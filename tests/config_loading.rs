use hisab::prelude::*;

#[test]
fn test_try_from_json_file() {
    let path = std::env::temp_dir().join(format!("hisab-config-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "year_days": 366, "default_calendar": "BS", "leap_day_policy": "clamp-to-february" }"#,
    )
    .unwrap();

    let config = HisabConfig::try_from_json(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.year_days, 366);
    assert_eq!(config.default_calendar, CalendarType::Bs);
    assert_eq!(config.leap_day_policy, LeapDayPolicy::ClampToFebruary);
}

#[test]
fn test_missing_file_is_a_configuration_error() {
    let res = HisabConfig::try_from_json("/definitely/not/here/hisab.json");
    assert!(matches!(res, Err(HisabError::ConfigurationError { .. })));
}

#[test]
fn test_invalid_year_days_rejected() {
    assert!(HisabConfig::new(0, CalendarType::Ad).is_err());
    assert!(HisabConfig::new(360, CalendarType::Ad).is_ok());
    assert!(HisabConfig::default().with_display_precision(20).validate().is_err());
}

#[test]
fn test_from_env_reads_hisab_variables() {
    // Only test in this binary that touches the environment.
    unsafe {
        std::env::set_var("HISAB_YEAR_DAYS", "360");
        std::env::set_var("HISAB_CALENDAR", "bs");
        std::env::set_var("HISAB_LEAP_DAY_POLICY", "Clamp-To-February");
    }
    let config = HisabConfig::from_env();
    unsafe {
        std::env::remove_var("HISAB_YEAR_DAYS");
        std::env::remove_var("HISAB_CALENDAR");
        std::env::remove_var("HISAB_LEAP_DAY_POLICY");
    }

    let config = config.unwrap();
    assert_eq!(config.year_days, 360);
    assert_eq!(config.default_calendar, CalendarType::Bs);
    assert_eq!(config.leap_day_policy, LeapDayPolicy::ClampToFebruary);
}
