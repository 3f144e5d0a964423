mod browser;

fn main() -> std::process::ExitCode {
    browser::run()
}
