//! Generates synthetic INI files of specified line counts for benchmarking

pub fn generate_config(target_lines: usize) -> String {
    let mut output = String::with_capacity(target_lines * 32);

    output.push_str("# Synthetic benchmark config\n");
    output.push_str("scale = 2\n");
    output.push_str("name = \"bench; config\"\n");
    output.push('\n');

    let mut lines = 4;
    let mut section_num = 0;

    while lines < target_lines {
        // A new section every ~25 lines
        output.push_str(&format!("[section{}]\n", section_num));
        section_num += 1;
        lines += 1;

        let values_in_section = (target_lines - lines).min(23);
        for i in 0..values_in_section {
            let val_id = (section_num - 1) * 25 + i;
            match i % 5 {
                0 => output.push_str(&format!("int_{} = {}\n", val_id, val_id * 10)),
                1 => output.push_str(&format!("float_{} = {:.2} ; tuned\n", val_id, val_id as f64 * 0.5)),
                2 => output.push_str(&format!("str_{} = value {}\n", val_id, val_id)),
                3 => output.push_str(&format!(
                    "list_{} = [{}, {}.5, -{}]\n",
                    val_id,
                    val_id,
                    val_id,
                    val_id * 2
                )),
                4 => output.push_str(&format!("bool_{} = {}\n", val_id, val_id % 2 == 0)),
                _ => unreachable!(),
            }
            lines += 1;
        }

        if lines < target_lines {
            output.push('\n');
            lines += 1;
        }
    }

    output
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::generate_config;

    #[test]
    fn test_generate_small() {
        let config = generate_config(50);
        let lines = config.lines().count();
        assert!((48..=52).contains(&lines), "Got {} lines", lines);
    }

    #[test]
    fn test_generate_large() {
        let config = generate_config(1000);
        let lines = config.lines().count();
        assert!((998..=1002).contains(&lines), "Got {} lines", lines);
    }

    #[test]
    fn test_has_sections() {
        let config = generate_config(100);
        assert!(config.contains("[section0]"));
        assert!(config.contains("[section3]"));
    }
}
