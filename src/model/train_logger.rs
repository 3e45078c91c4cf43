use colored::Colorize;


/// Prints training progress every `log_every` epochs.
pub(crate) struct TrainLogger {
    log_every: usize,
    enabled: bool,
}


impl TrainLogger {
    pub(crate) fn new(log_every: usize, enabled: bool) -> Self {
        Self { log_every: log_every.max(1), enabled }
    }


    pub(crate) fn log(&self, epoch: usize, loss: f64) {
        if !self.enabled || epoch % self.log_every != 0 {
            return;
        }
        let header = format!("[epoch {epoch:>5}]").bold();
        let loss = format!("loss = {loss:.6}").green();
        println!("{header} {loss}");
    }


    pub(crate) fn finish(&self, epoch: usize, loss: f64) {
        if !self.enabled {
            return;
        }
        let header = "[  done  ]".bold();
        let body = format!("epoch = {epoch}, loss = {loss:.6}").cyan();
        println!("{header} {body}");
    }
}
