use rpassword::read_password;
use std::io;
use std::io::Write;

pub fn input_password(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().unwrap();
    read_password().unwrap_or_default()
}

pub fn input_password_trim(prompt: &str) -> String {
    input_password(prompt).trim().to_string()
}
