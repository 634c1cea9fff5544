use proptest::prelude::*;
use sudb::command::{Command, VarScope};

proptest! {
    #[test]
    fn console_parse_is_total_and_deterministic(line in "\\PC*") {
        let first = Command::parse_console(&line);
        let second = Command::parse_console(&line);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn console_never_yields_wire_only_forms(line in "\\PC*") {
        let cmd = Command::parse_console(&line);
        let is_wire_only = matches!(
            cmd,
            Command::Start | Command::Exit | Command::ThreadList | Command::Frame { .. }
        );
        prop_assert!(!is_wire_only);
    }

    #[test]
    fn wire_never_yields_console_only_forms(line in "\\PC*") {
        let cmd = Command::parse_wire(&line);
        let is_console_only = matches!(
            cmd,
            Command::Help
                | Command::FrameUp
                | Command::FrameDown
                | Command::ListSource
                | Command::ListBreakpoints
        );
        prop_assert!(!is_console_only);
    }

    #[test]
    fn breakpoint_lines_parse_in_both_dialects(
        file in "[a-zA-Z0-9_/]{1,12}",
        line in 1u64..100_000u64,
    ) {
        prop_assert_eq!(
            Command::parse_wire(&format!("b {file}:{line}")),
            Command::AddBreakpoint { file: Some(file.clone()), line }
        );
        prop_assert_eq!(
            Command::parse_console(&format!("break {file}:{line}")),
            Command::AddBreakpoint { file: Some(file), line }
        );
    }

    #[test]
    fn delete_lines_parse_their_index(index in 0u64..1_000_000_000u64) {
        prop_assert_eq!(
            Command::parse_console(&format!("del {index}")),
            Command::DeleteBreakpoint { index }
        );
        prop_assert_eq!(
            Command::parse_wire(&format!("delete {index}")),
            Command::DeleteBreakpoint { index }
        );
    }

    #[test]
    fn instance_ids_parse_as_hex(object_id in 0u64..u64::MAX / 2) {
        prop_assert_eq!(
            Command::parse_wire(&format!("v i {object_id:x}")),
            Command::Vars { scope: VarScope::Instance(object_id) }
        );
        prop_assert_eq!(
            Command::parse_console(&format!("var instance 0x{object_id:x}")),
            Command::Vars { scope: VarScope::Instance(object_id) }
        );
    }
}
