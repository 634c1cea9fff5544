//! XML framing for the wire protocol.
//!
//! One element per line except the multi-line containers
//! (`frames`/`threads`/`variables`). Bytes are written as-is; values
//! coming from the engine pass through [`escape`] first.

use crate::types::{BreakPoint, StackFrame, Variable, VariableKind};

/// Escape a value for embedding in an attribute. The ampersand is replaced
/// first so the entities introduced by later steps are not re-escaped.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

pub fn breakpoint_added(bp: &BreakPoint) -> String {
    format!(
        "<breakpointAdded no=\"{}\" location=\"{}:{}\"/>\n",
        bp.index, bp.file, bp.line
    )
}

pub fn breakpoint_deleted(index: u64) -> String {
    format!("<breakpointDeleted no=\"{index}\" />\n")
}

/// Stop notification for a breakpoint hit.
pub fn breakpoint_stop(bp: &BreakPoint) -> String {
    format!(
        "<breakpoint file=\"{}\" line=\"{}\" threadId=\"1\"/>\n",
        bp.file, bp.line
    )
}

/// Stop notification for a suspension without a breakpoint.
pub fn suspended(file: &str, line: u64) -> String {
    format!(
        "<suspended file=\"{}\" line=\"{}\" threadId=\"1\" frames=\"1\"/>\n",
        escape(file),
        line
    )
}

/// Frame list; the active frame carries `current="yes"`. Frame elements
/// run together on one line between the container tags.
pub fn frames(frames: &[StackFrame], active_index: u64) -> String {
    let mut out = String::from("<frames>\n");
    for (i, frame) in frames.iter().enumerate() {
        let file = escape(&frame.file);
        if i as u64 == active_index {
            out.push_str(&format!(
                "<frame no=\"{i}\" file=\"{file}\" line=\"{}\" current=\"yes\"/>",
                frame.line
            ));
        } else {
            out.push_str(&format!(
                "<frame no=\"{i}\" file=\"{file}\" line=\"{}\"/>",
                frame.line
            ));
        }
    }
    out.push_str("</frames>\n");
    out
}

pub fn threads() -> &'static str {
    "<threads>\n<thread id=\"1\" status=\"run\"/>\n</threads>\n"
}

pub fn variables(vars: &[Variable], kind: VariableKind) -> String {
    let mut out = String::from("<variables>\n");
    for var in vars {
        out.push_str(&format!(
            "<variable name=\"{}\" kind=\"{}\" value=\"{}\" type=\"{}\" hasChildren=\"{}\" objectId=\"{:x}\"/>\n",
            escape(&var.name),
            kind.as_str(),
            escape(&var.value),
            var.type_name,
            var.has_children,
            var.object_id
        ));
    }
    out.push_str("</variables>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_all_specials_in_order() {
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("<x>"), "&lt;x&gt;");
        assert_eq!(escape("\"q\" 'a'"), "&quot;q&quot; &apos;a&apos;");
        // An already-escaped ampersand is escaped again, not left alone.
        assert_eq!(escape("&amp;"), "&amp;amp;");
        // The replacements introduced for quotes must not get their
        // ampersands doubled.
        assert_eq!(escape("&\""), "&amp;&quot;");
    }

    #[test]
    fn breakpoint_elements() {
        let bp = BreakPoint {
            index: 1,
            file: "/x.rb".into(),
            line: 10,
            enabled: true,
        };
        assert_eq!(
            breakpoint_added(&bp),
            "<breakpointAdded no=\"1\" location=\"/x.rb:10\"/>\n"
        );
        assert_eq!(
            breakpoint_deleted(1),
            "<breakpointDeleted no=\"1\" />\n"
        );
        assert_eq!(
            breakpoint_stop(&bp),
            "<breakpoint file=\"/x.rb\" line=\"10\" threadId=\"1\"/>\n"
        );
    }

    #[test]
    fn suspended_escapes_file() {
        assert_eq!(
            suspended("/a&b.rb", 4),
            "<suspended file=\"/a&amp;b.rb\" line=\"4\" threadId=\"1\" frames=\"1\"/>\n"
        );
    }

    #[test]
    fn frame_list_marks_active_inline() {
        let fs = vec![
            StackFrame {
                name: "inner".into(),
                file: "/x.rb".into(),
                line: 10,
            },
            StackFrame {
                name: "outer".into(),
                file: "/x.rb".into(),
                line: 3,
            },
        ];
        assert_eq!(
            frames(&fs, 1),
            "<frames>\n<frame no=\"0\" file=\"/x.rb\" line=\"10\"/>\
             <frame no=\"1\" file=\"/x.rb\" line=\"3\" current=\"yes\"/></frames>\n"
        );
    }

    #[test]
    fn variable_list_with_kind_and_hex_object_id() {
        let vars = vec![Variable {
            name: "items".into(),
            value: "[1, 2]".into(),
            type_name: "Array".into(),
            object_id: 0x2af,
            has_children: true,
        }];
        assert_eq!(
            variables(&vars, VariableKind::Local),
            "<variables>\n<variable name=\"items\" kind=\"local\" value=\"[1, 2]\" \
             type=\"Array\" hasChildren=\"true\" objectId=\"2af\"/>\n</variables>\n"
        );
    }

    #[test]
    fn empty_variable_list_is_a_bare_container() {
        assert_eq!(variables(&[], VariableKind::Watch), "<variables>\n</variables>\n");
    }
}
