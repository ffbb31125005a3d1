use std::{io, io::Write};

use colored::Colorize;

pub fn print_error_message(error_message: &str) {
    println!("{}", error_message.red());
}

pub fn print_warn_message(error_message: &str) {
    println!("{}", error_message.yellow());
}

pub fn print_success_message(success_message: &str) {
    println!("{}", success_message.green());
}

pub fn prompt_for_input_list(field_name: &str, options: &[String]) -> io::Result<String> {
    let options_str = options.join(", ");

    loop {
        print!("{} [{}]: ", field_name.green(), options_str.yellow());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input provided"));
        }
        let trimmed = input.trim().to_lowercase();

        if options.contains(&trimmed) {
            return Ok(trimmed);
        }

        println!(
            "{}",
            format!("Invalid option. Please choose one of the following: {}", options_str).red()
        );
    }
}
