fn main() {
    // ESP-IDF environment (linker args, sdkconfig) only matters for the
    // firmware build; host test builds skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
