fn main() {
    cluster_layout::app::run();
}
