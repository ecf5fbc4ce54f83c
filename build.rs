fn main() {
    // Re-expand the `#[fixtures]` globs when a UA fixture file is added.
    fixtures::build::watch_dir("tests/fixtures");
}
