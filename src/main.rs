fn main() {
    azprov::run_cli();
}
