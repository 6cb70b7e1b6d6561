fn main() {
    boligpris::run();
}
