/// Check if the process token belongs to a member of the Administrators group
pub fn is_admin() -> bool {
    use winapi::um::shellapi::IsUserAnAdmin;

    // SAFETY: IsUserAnAdmin takes no arguments and only queries the current token.
    unsafe { IsUserAnAdmin() != 0 }
}
