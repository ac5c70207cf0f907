#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn level_spec_covers_our_crates() {
        let spec = level_spec_for("DEBUG");
        assert_eq!(
            spec,
            "survey_check=debug,survey_model=debug,survey_expr=debug,logging=debug"
        );
    }

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(true, false, Some("warn"), Some("survey_model=trace"));
        assert_eq!(spec, "survey_model=trace");
    }

    #[test]
    fn flags_select_crate_scoped_levels() {
        assert_eq!(compute_spec(true, false, None, None), level_spec_for("trace"));
        assert_eq!(compute_spec(false, true, None, None), level_spec_for("debug"));
        assert_eq!(
            compute_spec(false, false, Some("warn"), None),
            level_spec_for("warn")
        );
    }

    #[test]
    fn log_args_forward_to_compute_spec() {
        let args = LogArgs {
            debug: true,
            ..LogArgs::default()
        };
        assert_eq!(args.spec(), level_spec_for("debug"));
    }

    #[test]
    fn compact_is_the_default_format() {
        assert_eq!(LogArgs::default().log_format, LogFormat::Compact);
    }
}
