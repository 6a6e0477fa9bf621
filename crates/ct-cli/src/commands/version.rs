pub(crate) fn run() {
    println!("Version:    {}", env!("CT_VERSION"));
    println!("Git commit: {}", env!("CT_GIT_COMMIT"));
    println!("Build date: {}", env!("CT_BUILD_DATE"));
}
