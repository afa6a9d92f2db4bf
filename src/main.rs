use mbx::dispatch::run_commander;
use mbx::plugin::MemoryRegistry;

fn main() {
    // Package discovery lives outside the command core; an empty registry
    // keeps the full dispatch surface available.
    let registry = MemoryRegistry::default();
    run_commander(&registry)
}
